//! Editor settings - persisted user configuration.
//!
//! Settings are read from a TOML file at startup. A missing file means
//! defaults; a malformed one is reported so the host can decide what to do.

use std::path::{Path, PathBuf};
use std::time::Duration;

use codepad_model::Language;
use codepad_persistence::AutoSaveConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::document::SwitchPolicy;
use crate::layout::DEFAULT_PANEL_HEIGHT;

// =============================================================================
// ERRORS
// =============================================================================

/// Failure to load, save, or interpret settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file: {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write settings file: {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings file: {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize settings")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid key binding: '{0}'")]
    InvalidKeyChord(String),
}

// =============================================================================
// ROOT SETTINGS
// =============================================================================

/// Editor settings.
///
/// Serialized to TOML and stored in the user's config directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Debounced document saving.
    pub autosave: AutoSaveConfig,

    /// Execution backend behavior.
    pub execution: ExecutionSettings,

    /// Output panel layout.
    pub layout: LayoutSettings,

    /// Session behavior.
    pub session: SessionSettings,

    /// Keyboard shortcuts.
    pub keymap: KeymapSettings,
}

impl EditorSettings {
    /// Load settings from a specific path. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            tracing::debug!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| SettingsError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Render as the TOML written by [`EditorSettings::save_to`].
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SettingsError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let content = self.to_toml()?;

        std::fs::write(path, content).map_err(|e| SettingsError::Write {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "Codepad", "Codepad")
            .map(|dirs| dirs.config_dir().join("settings.toml"))
            .unwrap_or_else(|| PathBuf::from("settings.toml"))
    }
}

// =============================================================================
// SECTIONS
// =============================================================================

/// Execution backend settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionSettings {
    /// Give up on a run after this many milliseconds (0 = wait forever).
    pub timeout_ms: u64,

    /// Lower bound of the simulated backend latency.
    pub latency_min_ms: u64,

    /// Upper bound of the simulated backend latency.
    pub latency_max_ms: u64,
}

impl Default for ExecutionSettings {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            latency_min_ms: 1000,
            latency_max_ms: 2000,
        }
    }
}

impl ExecutionSettings {
    /// Run timeout, or `None` when runs may wait forever.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}

/// Output panel settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Panel height at session start, clamped to the allowed range.
    pub initial_height: u32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            initial_height: DEFAULT_PANEL_HEIGHT,
        }
    }
}

/// Session behavior settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// What happens to a pending save when the language changes.
    pub switch_policy: SwitchPolicy,

    /// Language selected when a session starts.
    pub default_language: Language,
}

/// Key bindings as chord strings (e.g. `ctrl+enter`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeymapSettings {
    pub run: Vec<String>,
    pub fullscreen: Vec<String>,
}

impl Default for KeymapSettings {
    fn default() -> Self {
        Self {
            run: vec!["ctrl+enter".to_string(), "cmd+enter".to_string()],
            fullscreen: vec!["f11".to_string()],
        }
    }
}
