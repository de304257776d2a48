//! Persistence error types.
//!
//! Reads never produce errors (a missing value is a normal outcome). Only
//! opening a store and writing to it can fail.

use std::path::PathBuf;
use thiserror::Error;

/// Persistence operation error.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// File I/O error.
    #[error("Failed to {operation} store file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store file exists but is not a JSON object of strings.
    #[error("Invalid store file format: {path}")]
    InvalidFormat { path: PathBuf, reason: String },

    /// Serialization error.
    #[error("Failed to serialize store contents")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("Failed to complete save operation")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing store refused the write (full, read-only, detached).
    #[error("Store unavailable: {reason}")]
    Unavailable { reason: String },
}

impl PersistenceError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Io {
                operation, path, ..
            } => {
                format!("Could not {} the store at {}", operation, path.display())
            }
            Self::InvalidFormat { path, reason } => {
                format!(
                    "The store at {} could not be read: {}",
                    path.display(),
                    reason
                )
            }
            Self::Serialization { .. } => {
                "An error occurred while preparing your code for saving.".to_string()
            }
            Self::AtomicWriteFailed { target_path, .. } => {
                format!(
                    "Could not save to {}. Please check disk space and permissions.",
                    target_path.display()
                )
            }
            Self::Unavailable { reason } => format!("Local storage is unavailable ({reason})."),
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Io { operation, .. } => {
                if *operation == "read" {
                    Some("Check that you have permission to read the store file.".into())
                } else {
                    Some("Check that you have permission to write to this location.".into())
                }
            }
            Self::InvalidFormat { .. } => {
                Some("Move the damaged file aside; a fresh store will be created.".into())
            }
            Self::Serialization { .. } => None,
            Self::AtomicWriteFailed { .. } | Self::Unavailable { .. } => {
                Some("Free up disk space or point --store at a writable location.".into())
            }
        }
    }
}

/// Result type alias for persistence operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;
