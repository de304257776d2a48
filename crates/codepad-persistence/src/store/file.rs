//! File-backed store.
//!
//! The whole store is one JSON object of strings. It is read once when the
//! store is opened and rewritten atomically (temp file + rename) on every
//! write, so a crash mid-write leaves the previous contents intact.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{PersistenceError, Result};
use crate::key::StoreKey;
use crate::store::KeyValueStore;

/// A store persisted to a single JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`. A missing file opens as an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| PersistenceError::Io {
                operation: "read",
                path: path.clone(),
                source: e,
            })?;
            parse_entries(&content, &path)?
        } else {
            tracing::debug!("No store at {}, starting empty", path.display());
            BTreeMap::new()
        };

        tracing::debug!("Opened store {} ({} keys)", path.display(), entries.len());
        Ok(Self { path, entries })
    }

    /// Open the store at the default per-user location.
    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path())
    }

    /// Get the default store file path.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "Codepad", "Codepad")
            .map(|dirs| dirs.data_dir().join("store.json"))
            .unwrap_or_else(|| PathBuf::from("codepad-store.json"))
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for FileStore {
    fn read_string(&self, key: StoreKey) -> Option<String> {
        self.entries.get(&key.as_string()).cloned()
    }

    fn write_string(&mut self, key: StoreKey, value: &str) -> Result<()> {
        let mut next = self.entries.clone();
        next.insert(key.as_string(), value.to_string());

        let bytes = serde_json::to_vec_pretty(&next)
            .map_err(|e| PersistenceError::Serialization { source: e })?;
        write_atomic(&self.path, &bytes)?;

        // Only adopt the new contents once they are on disk.
        self.entries = next;
        tracing::debug!("Wrote {} to {}", key, self.path.display());
        Ok(())
    }
}

fn parse_entries(content: &str, path: &Path) -> Result<BTreeMap<String, String>> {
    if content.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    serde_json::from_str(content).map_err(|e| PersistenceError::InvalidFormat {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let temp_path = path.with_extension("json.tmp");

    // Create parent directory if needed
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| PersistenceError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let mut file = File::create(&temp_path).map_err(|e| PersistenceError::Io {
        operation: "create",
        path: temp_path.clone(),
        source: e,
    })?;

    file.write_all(bytes).map_err(|e| PersistenceError::Io {
        operation: "write",
        path: temp_path.clone(),
        source: e,
    })?;

    file.sync_all().map_err(|e| PersistenceError::Io {
        operation: "sync",
        path: temp_path.clone(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| PersistenceError::AtomicWriteFailed {
        temp_path: temp_path.clone(),
        target_path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use codepad_model::Language;
    use tempfile::tempdir;

    #[test]
    fn missing_file_opens_empty() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path().join("store.json")).unwrap();
        assert_eq!(store.read_string(StoreKey::Theme), None);
    }

    #[test]
    fn write_creates_parent_and_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let mut store = FileStore::open(&path).unwrap();
        store
            .write_string(StoreKey::Document(Language::Java), "class A {}")
            .unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn empty_file_is_an_empty_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "").unwrap();

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.read_string(StoreKey::Theme), None);
    }
}
