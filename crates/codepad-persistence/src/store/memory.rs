use std::collections::BTreeMap;

use crate::error::Result;
use crate::key::StoreKey;
use crate::store::KeyValueStore;

/// In-memory store. Contents vanish with the value.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn read_string(&self, key: StoreKey) -> Option<String> {
        self.entries.get(&key.as_string()).cloned()
    }

    fn write_string(&mut self, key: StoreKey, value: &str) -> Result<()> {
        self.entries.insert(key.as_string(), value.to_string());
        Ok(())
    }
}
