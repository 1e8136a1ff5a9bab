//! Storage backends for the persisted session snapshot.
//!
//! A backend stores opaque string values under string keys, the way a browser's
//! local storage does. [`SessionStore`](crate::auth::SessionStore) serializes its
//! snapshot to JSON before handing it to the backend.
//!
//! - [`MemoryStorage`]: process-local, lost on exit
//! - [`FileStorage`]: one `<key>.json` file per key inside a directory

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

/// Errors raised by a [`SessionStorage`] backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the underlying medium failed.
    #[error("Session storage I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The stored value could not be (de)serialized.
    #[error("Session snapshot could not be serialized: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The key cannot be mapped to a storage location.
    #[error("Invalid storage key '{key}'. Keys must be non-empty and contain no path separators.")]
    InvalidKey {
        /// The rejected key.
        key: String,
    },
}

/// A key-value backend for the session snapshot.
pub trait SessionStorage: Send + Sync + fmt::Debug {
    /// Returns the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be written.
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes the value stored under `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Creates an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values().remove(key);
        Ok(())
    }
}

/// File-backed storage writing `<dir>/<key>.json`.
///
/// The directory is created on first write.
///
/// # Example
///
/// ```rust,no_run
/// use banthing_client::auth::{FileStorage, SessionStorage};
///
/// let storage = FileStorage::new("/tmp/banthing");
/// storage.save("auth", r#"{"user":null,"isAuthenticated":false}"#).unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Creates a storage rooted at `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the directory values are written to.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty() || key == "." || key == ".." || key.contains(['/', '\\']) {
            return Err(StorageError::InvalidKey {
                key: key.to_string(),
            });
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl SessionStorage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(path, value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path_for(key)?) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.load("auth").unwrap(), None);

        storage.save("auth", "{}").unwrap();
        assert_eq!(storage.load("auth").unwrap().as_deref(), Some("{}"));

        storage.remove("auth").unwrap();
        assert_eq!(storage.load("auth").unwrap(), None);
    }

    #[test]
    fn test_file_storage_writes_key_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"));

        storage.save("auth", r#"{"isAuthenticated":true}"#).unwrap();

        let written = std::fs::read_to_string(dir.path().join("nested").join("auth.json")).unwrap();
        assert_eq!(written, r#"{"isAuthenticated":true}"#);
        assert_eq!(
            storage.load("auth").unwrap().as_deref(),
            Some(r#"{"isAuthenticated":true}"#)
        );
    }

    #[test]
    fn test_file_storage_missing_key_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        assert_eq!(storage.load("auth").unwrap(), None);
        storage.remove("auth").unwrap();
    }

    #[test]
    fn test_file_storage_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        for key in ["", "..", "../escape", "a/b", "a\\b"] {
            assert!(matches!(
                storage.save(key, "{}"),
                Err(StorageError::InvalidKey { .. })
            ));
        }
    }
}
