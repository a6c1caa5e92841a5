//! File-based Key-Value Store Adapter
//!
//! Stores each key as one JSON file in a base directory. Writes go through a
//! temp file and a rename so a crash never leaves a half-written value.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::ports::{KeyValueStore, StorageError};

/// File-based key-value store
///
/// # Directory Structure
///
/// ```text
/// {base_path}/
/// ├── decision-helper-state.json
/// └── decision-helper-state.json.tmp   (only during a write)
/// ```
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    base_path: PathBuf,
}

impl FileKeyValueStore {
    /// Create a store rooted at `base_path`. The directory is created on
    /// first write.
    ///
    /// # Example
    /// ```ignore
    /// let store = FileKeyValueStore::new(".decision-helper");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Keys become file names, so they must not escape the base directory.
    fn validate_key(key: &str) -> Result<(), StorageError> {
        if key.is_empty()
            || key == "."
            || key.contains("..")
            || key.contains('/')
            || key.contains('\\')
        {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(())
    }

    fn value_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", key))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.json.tmp", key))
    }

    fn ensure_dir(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.base_path).map_err(|e| {
            StorageError::io(format!(
                "Failed to create directory {}: {}",
                self.base_path.display(),
                e
            ))
        })
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::validate_key(key)?;
        let path = self.value_path(key);

        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::validate_key(key)?;
        self.ensure_dir()?;

        let temp_path = self.temp_path(key);
        let final_path = self.value_path(key);

        let mut file = fs::File::create(&temp_path).map_err(|e| {
            StorageError::io(format!(
                "Failed to create temp file {}: {}",
                temp_path.display(),
                e
            ))
        })?;

        file.write_all(value.as_bytes()).map_err(|e| {
            StorageError::io(format!(
                "Failed to write to temp file {}: {}",
                temp_path.display(),
                e
            ))
        })?;

        file.sync_all().map_err(|e| {
            StorageError::io(format!(
                "Failed to sync temp file {}: {}",
                temp_path.display(),
                e
            ))
        })?;

        fs::rename(&temp_path, &final_path).map_err(|e| {
            StorageError::io(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                final_path.display(),
                e
            ))
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        Self::validate_key(key)?;
        let path = self.value_path(key);

        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io(format!(
                "Failed to remove {}: {}",
                path.display(),
                e
            ))),
        }
    }
}
