//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use codepad_model::Language;
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "codepad",
    version,
    about = "Codepad - write, save and run code snippets from the terminal",
    long_about = "Write, save and run code snippets in JavaScript, Python, C++ and Java.\n\n\
                  Documents are saved per language and restored on the next start.\n\
                  Execution is simulated; no code is actually compiled."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Store file for documents and preferences (default: platform data dir).
    #[arg(long = "store", value_name = "PATH", global = true)]
    pub store: Option<PathBuf>,

    /// Settings file (default: platform config dir).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List supported languages and whether a document is saved for each.
    Languages,

    /// Print the document that would open for a language.
    Show(ShowArgs),

    /// Run a document (or a file) through the simulated backend.
    Run(RunArgs),

    /// Start an interactive editing session.
    Shell(ShellArgs),

    /// Print the effective settings as TOML.
    Settings(SettingsArgs),
}

#[derive(Parser)]
pub struct ShowArgs {
    /// Language tag (javascript, python, cpp, java).
    #[arg(value_name = "LANG", value_parser = parse_language)]
    pub language: Language,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Language tag (javascript, python, cpp, java).
    #[arg(value_name = "LANG", value_parser = parse_language)]
    pub language: Language,

    /// Run this file instead of the saved document. The store is not touched.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ShellArgs {
    /// Language to start with (default from settings).
    #[arg(value_name = "LANG", value_parser = parse_language)]
    pub language: Option<Language>,
}

#[derive(Parser)]
pub struct SettingsArgs {
    /// Also write them to the settings file if it does not exist yet.
    #[arg(long = "init")]
    pub init: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

fn parse_language(raw: &str) -> Result<Language, String> {
    raw.parse::<Language>().map_err(|error| error.user_message())
}
