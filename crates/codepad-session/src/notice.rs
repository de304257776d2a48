//! Transient user-facing notices.
//!
//! A notice is the session's equivalent of a toast: a short message the
//! host shows for a moment and then drops. Notices never carry state the
//! session depends on.

use serde::Serialize;

pub const EMPTY_SOURCE: &str = "Please write some code first!";
pub const RUN_SUCCEEDED: &str = "Code executed successfully!";
pub const RUN_FAILED: &str = "Failed to execute code";
pub const COPY_SUCCEEDED: &str = "Code copied to clipboard!";
pub const COPY_FAILED: &str = "Failed to copy code";
pub const STORE_DEGRADED: &str = "Changes can't be saved; keeping them for this session only";

/// A notice for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// The message to display.
    pub message: String,
    /// Notice kind determines the icon and styling.
    pub kind: NoticeKind,
}

/// Kind of notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Info,
    Warning,
    Error,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, message)
    }

    fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }
}
