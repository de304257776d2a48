//! Execution backend contract and the simulated backend.
//!
//! Real compilation is out of scope: [`SimulatedBackend`] answers with canned
//! output after a random delay, which is enough to drive the run lifecycle.

use std::future::Future;
use std::sync::LazyLock;
use std::time::Duration;

use codepad_model::{ExecutionResult, Language};
use regex::Regex;
use thiserror::Error;

use crate::config::ExecutionSettings;
use crate::notice::RUN_FAILED;

/// `console.log(...)` calls, up to the first closing parenthesis.
static CONSOLE_LOG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"console\.log\((.*?)\)").expect("valid console.log regex"));

/// Failure to get any answer from the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum BackendError {
    /// The request never reached the backend or the reply was lost.
    #[error("backend transport error: {0}")]
    Transport(String),

    /// No answer within the configured limit.
    #[error("execution timed out after {} ms", .0.as_millis())]
    TimedOut(Duration),
}

impl BackendError {
    /// Returns the message recorded as the run's error.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(_) => RUN_FAILED.to_string(),
            Self::TimedOut(limit) => {
                format!("Execution timed out after {} ms", limit.as_millis())
            }
        }
    }
}

/// Turns source text into a result.
pub trait ExecutionBackend: Send + Sync + 'static {
    fn execute(
        &self,
        source: String,
        language: Language,
    ) -> impl Future<Output = Result<ExecutionResult, BackendError>> + Send;
}

/// Canned-output backend with a random latency.
#[derive(Debug, Clone)]
pub struct SimulatedBackend {
    latency_min: Duration,
    latency_max: Duration,
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::from_settings(&ExecutionSettings::default())
    }
}

impl SimulatedBackend {
    /// Backend whose latency is uniform in `[min, max]`.
    pub fn new(min: Duration, max: Duration) -> Self {
        Self {
            latency_min: min.min(max),
            latency_max: max.max(min),
        }
    }

    /// Backend that answers without delay.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub fn from_settings(settings: &ExecutionSettings) -> Self {
        Self::new(
            Duration::from_millis(settings.latency_min_ms),
            Duration::from_millis(settings.latency_max_ms),
        )
    }

    fn latency(&self) -> Duration {
        let min = self.latency_min.as_millis() as u64;
        let max = self.latency_max.as_millis() as u64;
        Duration::from_millis(fastrand::u64(min..=max))
    }
}

impl ExecutionBackend for SimulatedBackend {
    fn execute(
        &self,
        source: String,
        language: Language,
    ) -> impl Future<Output = Result<ExecutionResult, BackendError>> + Send {
        let delay = self.latency();
        async move {
            tracing::debug!("Simulating {} run ({} ms)", language, delay.as_millis());
            tokio::time::sleep(delay).await;
            Ok(simulate(&source, language))
        }
    }
}

/// The canned answer for `source`.
///
/// JavaScript echoes the arguments of every `console.log` call with quotes
/// stripped; other languages always print the Fibonacci demo output.
pub fn simulate(source: &str, language: Language) -> ExecutionResult {
    match language {
        Language::JavaScript if source.contains("console.log") => {
            let lines: Vec<String> = CONSOLE_LOG_REGEX
                .captures_iter(source)
                .map(|captures| captures[1].replace(['\'', '"'], ""))
                .collect();
            let output = lines.join("\n");
            if output.is_empty() {
                ExecutionResult::success("No output")
            } else {
                ExecutionResult::success(output)
            }
        }
        Language::JavaScript => ExecutionResult::success("Code executed successfully"),
        other => ExecutionResult::success(format!(
            "{} code executed successfully!\nHello, World!\nFibonacci(10): 55",
            other.tag()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn javascript_echoes_console_log_arguments() {
        let result = simulate(
            "console.log('a');\nconsole.log(\"b\", 2);",
            Language::JavaScript,
        );
        assert_eq!(result.output.as_deref(), Some("a\nb, 2"));
        assert_eq!(result.error, None);
    }

    #[test]
    fn javascript_template_output() {
        let result = simulate(Language::JavaScript.template(), Language::JavaScript);
        insta::assert_snapshot!(result.output.unwrap(), @r"
        Hello, World!
        Fibonacci(10
        ");
    }

    #[test]
    fn javascript_without_logging() {
        let result = simulate("let x = 1;", Language::JavaScript);
        assert_eq!(result.output.as_deref(), Some("Code executed successfully"));
    }

    #[test]
    fn empty_console_log_has_no_output() {
        let result = simulate("console.log()", Language::JavaScript);
        assert_eq!(result.output.as_deref(), Some("No output"));

        let result = simulate("console.log;", Language::JavaScript);
        assert_eq!(result.output.as_deref(), Some("No output"));
    }

    #[test]
    fn other_languages_get_canned_output() {
        let result = simulate("print('ignored')", Language::Python);
        insta::assert_snapshot!(result.output.unwrap(), @r"
        python code executed successfully!
        Hello, World!
        Fibonacci(10): 55
        ");
    }

    #[test]
    fn latency_bounds_are_ordered() {
        let backend = SimulatedBackend::new(Duration::from_millis(20), Duration::from_millis(10));
        for _ in 0..20 {
            let latency = backend.latency();
            assert!(latency >= Duration::from_millis(10) && latency <= Duration::from_millis(20));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn simulated_backend_waits_then_answers() {
        let backend = SimulatedBackend::new(Duration::from_millis(1000), Duration::from_millis(2000));
        let started = tokio::time::Instant::now();

        let result = backend
            .execute("int main() {}".to_string(), Language::Cpp)
            .await
            .unwrap();

        let waited = started.elapsed();
        assert!(waited >= Duration::from_millis(1000) && waited <= Duration::from_millis(2001));
        assert!(result.output.unwrap().starts_with("cpp code executed successfully!"));
    }
}
