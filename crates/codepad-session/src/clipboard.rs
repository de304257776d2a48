//! Clipboard collaborator.

use std::future::Future;
use std::sync::{Arc, Mutex};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    #[error("clipboard access was denied")]
    PermissionDenied,

    #[error("clipboard is unavailable: {0}")]
    Unavailable(String),
}

/// Somewhere to put copied text.
pub trait Clipboard: Send + Sync + 'static {
    fn copy(&self, text: String) -> impl Future<Output = Result<(), ClipboardError>> + Send;
}

/// Clipboard that keeps the last copied text in memory.
///
/// Clones share the same contents, so a test can keep one handle and give
/// another to the runtime.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Arc<Mutex<Option<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last copied text.
    pub fn contents(&self) -> Option<String> {
        self.contents
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl Clipboard for MemoryClipboard {
    fn copy(&self, text: String) -> impl Future<Output = Result<(), ClipboardError>> + Send {
        let result = self
            .contents
            .lock()
            .map(|mut guard| *guard = Some(text))
            .map_err(|_| ClipboardError::Unavailable("clipboard lock poisoned".to_string()));
        std::future::ready(result)
    }
}

/// Clipboard that refuses every copy.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeniedClipboard;

impl Clipboard for DeniedClipboard {
    fn copy(&self, _text: String) -> impl Future<Output = Result<(), ClipboardError>> + Send {
        std::future::ready(Err(ClipboardError::PermissionDenied))
    }
}
