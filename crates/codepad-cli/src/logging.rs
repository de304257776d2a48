//! Logging infrastructure using `tracing` and `tracing-subscriber`.
//!
//! # Log Levels
//!
//! - `error`: startup failures
//! - `warn`: failed saves, timed out runs, unreadable settings
//! - `info`: runs started and settled, documents saved
//! - `debug`: session state transitions
//! - `trace`: dropped notices and other noise
//!
//! `RUST_LOG` overrides the configured level unless a level was given
//! explicitly on the command line.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::Subscriber;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, MakeWriter},
    layer::{Layered, SubscriberExt},
    util::SubscriberInitExt,
};

/// Crates whose events follow the configured level.
const OWN_CRATES: &[&str] = &[
    "codepad",
    "codepad_cli",
    "codepad_model",
    "codepad_persistence",
    "codepad_session",
];

/// Configuration for logging behavior.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level_filter: LevelFilter,
    /// Let `RUST_LOG` replace `level_filter`.
    pub use_env_filter: bool,
    pub with_timestamps: bool,
    /// Include the module path.
    pub with_target: bool,
    pub with_ansi: bool,
    pub format: LogFormat,
    /// Write to this file instead of stderr.
    pub log_file: Option<PathBuf>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors.
    #[default]
    Pretty,
    /// Compact single-line format.
    Compact,
    /// JSON format for machine parsing.
    Json,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level_filter: LevelFilter::WARN,
            use_env_filter: true,
            with_timestamps: false,
            with_target: false,
            with_ansi: true,
            format: LogFormat::default(),
            log_file: None,
        }
    }
}

/// Boxed fmt layer over the filtered registry.
type FmtLayer = Box<dyn Layer<Layered<EnvFilter, Registry>> + Send + Sync>;

/// Initialize the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    if let Some(path) = &config.log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        init_logging_with_writer(config, Mutex::new(file));
    } else {
        init_logging_with_writer(config, io::stderr);
    }
    Ok(())
}

/// Initialize logging with a custom writer.
pub fn init_logging_with_writer<W>(config: &LogConfig, writer: W)
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    build_subscriber(config, writer).init();
}

/// The subscriber [`init_logging_with_writer`] installs.
fn build_subscriber<W>(config: &LogConfig, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let filter = build_env_filter(config.level_filter, config.use_env_filter);
    let base = fmt::layer()
        .with_writer(writer)
        .with_target(config.with_target);

    let layer: FmtLayer = match (config.format, config.with_timestamps) {
        (LogFormat::Json, _) => base.json().boxed(),
        (LogFormat::Compact, true) => base.compact().with_ansi(config.with_ansi).boxed(),
        (LogFormat::Compact, false) => base
            .compact()
            .with_ansi(config.with_ansi)
            .without_time()
            .boxed(),
        (LogFormat::Pretty, true) => base.with_ansi(config.with_ansi).boxed(),
        (LogFormat::Pretty, false) => base.with_ansi(config.with_ansi).without_time().boxed(),
    };

    tracing_subscriber::registry().with(filter).with(layer)
}

/// Filter directives for `level`: our crates at `level`, everything else
/// no louder than warn.
pub fn default_directives(level: LevelFilter) -> String {
    let level = level.to_string().to_lowercase();
    let external = if level == "off" || level == "error" {
        level.as_str()
    } else {
        "warn"
    };
    std::iter::once(external.to_string())
        .chain(OWN_CRATES.iter().map(|name| format!("{name}={level}")))
        .collect::<Vec<_>>()
        .join(",")
}

fn build_env_filter(level: LevelFilter, use_env_filter: bool) -> EnvFilter {
    if use_env_filter && let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::new(default_directives(level))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_cover_every_crate() {
        assert_eq!(
            default_directives(LevelFilter::DEBUG),
            "warn,codepad=debug,codepad_cli=debug,codepad_model=debug,\
             codepad_persistence=debug,codepad_session=debug"
        );
    }

    #[test]
    fn quiet_levels_apply_to_external_crates_too() {
        assert!(default_directives(LevelFilter::ERROR).starts_with("error,"));
        assert!(default_directives(LevelFilter::OFF).starts_with("off,"));
    }

    fn file_config(format: LogFormat) -> LogConfig {
        LogConfig {
            level_filter: LevelFilter::INFO,
            use_env_filter: false,
            with_ansi: false,
            format,
            ..LogConfig::default()
        }
    }

    fn log_to_file(config: &LogConfig, emit: impl FnOnce()) -> String {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codepad.log");
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .unwrap();

        tracing::subscriber::with_default(build_subscriber(config, Mutex::new(file)), emit);
        std::fs::read_to_string(&path).unwrap()
    }

    #[test]
    fn own_crates_log_at_the_configured_level() {
        let output = log_to_file(&file_config(LogFormat::Compact), || {
            tracing::info!(target: "codepad_session", "Saved python document");
            tracing::debug!(target: "codepad_session", "Session reset");
            tracing::info!(target: "tokio", "worker parked");
        });

        assert!(output.contains("Saved python document"));
        assert!(!output.contains("Session reset"));
        assert!(!output.contains("worker parked"));
    }

    #[test]
    fn json_format_writes_one_object_per_event() {
        let output = log_to_file(&file_config(LogFormat::Json), || {
            tracing::warn!(target: "codepad_persistence", "Could not save theme");
        });

        let line = output.lines().next().unwrap();
        assert!(line.starts_with('{'));
        assert!(line.contains("\"level\":\"WARN\""));
        assert!(line.contains("Could not save theme"));
    }
}
