//! The key-value store contract and its implementations.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::Result;
use crate::key::StoreKey;

/// String key-value storage for documents and preferences.
///
/// Writes are last-write-wins; there is exactly one writer per store.
pub trait KeyValueStore {
    /// Read a value. Absence is not an error.
    fn read_string(&self, key: StoreKey) -> Option<String>;

    /// Write a value, replacing any previous one.
    fn write_string(&mut self, key: StoreKey, value: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn read_string(&self, key: StoreKey) -> Option<String> {
        (**self).read_string(key)
    }

    fn write_string(&mut self, key: StoreKey, value: &str) -> Result<()> {
        (**self).write_string(key, value)
    }
}
