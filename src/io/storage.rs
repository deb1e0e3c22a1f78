//! Key-value storage port.
//!
//! The store never touches the filesystem directly; it talks to a
//! [`Storage`] holding string slots by key. [`FileStorage`] keeps the slots
//! in one JSON object on disk, [`MemoryStorage`] keeps them in memory.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tempfile::NamedTempFile;

use crate::io::lock::{FileLock, LockError};

/// File name of the slot file inside the data directory
pub const STORAGE_FILE: &str = "storage.json";

/// File name of the advisory lock guarding writes to the slot file
pub const LOCK_FILE: &str = ".storage.lock";

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("{path} is not a JSON object of string slots: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Lock(#[from] LockError),
}

/// A synchronous key-value slot store
pub trait Storage {
    /// Current value of `key`, or `None` when the slot was never written
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value of `key`
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Slots held in memory; lost when dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: IndexMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with one slot already populated
    pub fn with_slot(key: &str, value: &str) -> Self {
        let mut storage = Self::new();
        storage.slots.insert(key.to_string(), value.to_string());
        storage
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// File-backed
// ---------------------------------------------------------------------------

/// Slots persisted as one JSON object in `<dir>/storage.json`.
///
/// Every `get` reads the file again, so changes made by another process are
/// visible on the next call. Writes hold [`FileLock`] and replace the file
/// atomically; slots other than the one being written are preserved.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
    lock_path: PathBuf,
}

impl FileStorage {
    /// Open storage in `dir`, creating the directory if it is missing.
    pub fn open(dir: &Path) -> Result<Self, StorageError> {
        fs::create_dir_all(dir).map_err(|e| StorageError::WriteError {
            path: dir.to_path_buf(),
            source: e,
        })?;
        Ok(FileStorage {
            path: dir.join(STORAGE_FILE),
            lock_path: dir.join(LOCK_FILE),
        })
    }

    /// Path of the slot file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_slots(&self) -> Result<IndexMap<String, String>, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(IndexMap::new()),
            Err(e) => {
                return Err(StorageError::ReadError {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };
        if content.trim().is_empty() {
            return Ok(IndexMap::new());
        }
        serde_json::from_str(&content).map_err(|e| StorageError::Corrupt {
            path: self.path.clone(),
            source: e,
        })
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_slots()?.shift_remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let _lock = FileLock::acquire_default(&self.lock_path)?;
        let mut slots = self.read_slots()?;
        slots.insert(key.to_string(), value.to_string());

        let mut content =
            serde_json::to_string_pretty(&slots).map_err(|e| StorageError::WriteError {
                path: self.path.clone(),
                source: e.into(),
            })?;
        content.push('\n');

        atomic_write(&self.path, content.as_bytes()).map_err(|e| StorageError::WriteError {
            path: self.path.clone(),
            source: e,
        })?;
        tracing::debug!(key, bytes = value.len(), "slot written");
        Ok(())
    }
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn memory_storage_absent_slot_is_none() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("ng-todo.items").unwrap(), None);
    }

    #[test]
    fn memory_storage_set_then_get() {
        let mut storage = MemoryStorage::new();
        storage.set("k", "v1").unwrap();
        storage.set("k", "v2").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v2"));
    }

    #[test]
    fn file_storage_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let storage = FileStorage::open(tmp.path()).unwrap();
        assert_eq!(storage.get("ng-todo.items").unwrap(), None);
        assert!(!storage.path().exists());
    }

    #[test]
    fn file_storage_survives_reopen() {
        let tmp = TempDir::new().unwrap();
        let mut storage = FileStorage::open(tmp.path()).unwrap();
        storage.set("ng-todo.items", "[]").unwrap();

        let reopened = FileStorage::open(tmp.path()).unwrap();
        assert_eq!(reopened.get("ng-todo.items").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn file_storage_preserves_other_slots() {
        let tmp = TempDir::new().unwrap();
        let mut storage = FileStorage::open(tmp.path()).unwrap();
        storage.set("other.key", "keep me").unwrap();
        storage.set("ng-todo.items", "[]").unwrap();

        assert_eq!(storage.get("other.key").unwrap().as_deref(), Some("keep me"));
        let raw = fs::read_to_string(storage.path()).unwrap();
        let first = raw.find("other.key").unwrap();
        let second = raw.find("ng-todo.items").unwrap();
        assert!(first < second, "slot order should be preserved");
    }

    #[test]
    fn file_storage_creates_data_dir() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("nested/data");
        let mut storage = FileStorage::open(&dir).unwrap();
        storage.set("k", "v").unwrap();
        assert!(dir.join(STORAGE_FILE).exists());
    }

    #[test]
    fn file_storage_corrupt_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(STORAGE_FILE), "not json {{{").unwrap();
        let mut storage = FileStorage::open(tmp.path()).unwrap();

        assert!(matches!(
            storage.get("k"),
            Err(StorageError::Corrupt { .. })
        ));
        // A write must not clobber the unreadable file
        assert!(storage.set("k", "v").is_err());
        assert_eq!(
            fs::read_to_string(tmp.path().join(STORAGE_FILE)).unwrap(),
            "not json {{{"
        );
    }
}
