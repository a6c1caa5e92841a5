//! Local storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Key the session snapshot is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "decision-helper-state";

/// Local storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory of the file-backed key-value store
    #[serde(default = "default_dir")]
    pub dir: PathBuf,

    /// Key the session is stored under
    #[serde(default = "default_key")]
    pub key: String,
}

impl StorageConfig {
    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.key.trim().is_empty() {
            return Err(ValidationError::MissingRequired("STORAGE__KEY"));
        }
        if self.key.contains('/') || self.key.contains('\\') || self.key.contains("..") {
            return Err(ValidationError::InvalidStorageKey);
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            key: default_key(),
        }
    }
}

fn default_dir() -> PathBuf {
    PathBuf::from(".decision-helper")
}

fn default_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}
