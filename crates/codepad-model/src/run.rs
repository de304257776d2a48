//! Run lifecycle values.

use serde::{Deserialize, Serialize};

use crate::language::Language;

/// What an execution backend hands back for one run.
///
/// Exactly one of `output` / `error` is expected to be set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub output: Option<String>,
    pub error: Option<String>,
}

impl ExecutionResult {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            output: Some(output.into()),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            output: None,
            error: Some(error.into()),
        }
    }
}

/// State of the run controller.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunState {
    /// Nothing has run yet, or the last result was cleared.
    #[default]
    Idle,
    /// A request is in flight.
    Running { source: String, language: Language },
    /// The last run finished. Output and error are never both set.
    Settled {
        output: Option<String>,
        error: Option<String>,
    },
}

impl RunState {
    /// Project a backend result into a settled state.
    ///
    /// An error wins over output.
    pub fn settled_from(result: ExecutionResult) -> Self {
        match result.error {
            Some(error) => Self::Settled {
                output: None,
                error: Some(error),
            },
            None => Self::Settled {
                output: result.output,
                error: None,
            },
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }

    /// Displayed output, if the last run succeeded.
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::Settled { output, .. } => output.as_deref(),
            _ => None,
        }
    }

    /// Displayed error, if the last run failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Settled { error, .. } => error.as_deref(),
            _ => None,
        }
    }
}
