//! Persistent storage for Codepad documents and preferences.
//!
//! The store is a flat string-to-string map addressed by [`StoreKey`]:
//!
//! ```text
//! code-javascript  -> last saved JavaScript buffer
//! code-python      -> last saved Python buffer
//! code-cpp         -> last saved C++ buffer
//! code-java        -> last saved Java buffer
//! editor-theme     -> "dark" | "light"
//! ```
//!
//! # Architecture
//!
//! - `store/` - the [`KeyValueStore`] contract with in-memory and file-backed
//!   implementations
//! - `autosave/` - debounce configuration and the cancelable [`SaveTimer`]
//! - `key.rs` - typed storage keys
//! - `error.rs` - error types with user-friendly messages

mod autosave;
mod error;
mod key;
mod store;

pub use autosave::{AutoSaveConfig, SaveTimer};
pub use error::{PersistenceError, Result};
pub use key::StoreKey;
pub use store::{FileStore, KeyValueStore, MemoryStore};
