//! Key-Value Store Port - Interface for the local durable store the session
//! is mirrored to.
//!
//! Calls are synchronous: the state manager writes once per mutation and
//! does not batch.

/// Errors that can occur during key-value store operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl StorageError {
    pub fn io(message: impl Into<String>) -> Self {
        StorageError::Io(message.into())
    }
}

/// Port for a string-keyed, string-valued durable store.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Returns
    /// `None` if nothing is stored under the key
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value under `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
