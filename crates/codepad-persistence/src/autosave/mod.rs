//! Debounced auto-save.
//!
//! Provides:
//! - `AutoSaveConfig` - user settings for auto-save behavior
//! - `SaveTimer` - the single cancelable timer re-armed by every edit

mod config;
mod timer;

pub use config::AutoSaveConfig;
pub use timer::SaveTimer;
