//! Storage Adapters
//!
//! Implementations of the KeyValueStore port the session is mirrored to.
//!
//! ## Available Adapters
//!
//! - **FileKeyValueStore** - One JSON file per key on disk
//! - **InMemoryKeyValueStore** - Values in memory (testing/ephemeral sessions)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileKeyValueStore, InMemoryKeyValueStore};
//!
//! // Persistent: file-based store
//! let store = FileKeyValueStore::new(".decision-helper");
//!
//! // Testing: in-memory store
//! let store = InMemoryKeyValueStore::new();
//! ```

mod file_key_value_store;
mod in_memory_key_value_store;

pub use file_key_value_store::FileKeyValueStore;
pub use in_memory_key_value_store::InMemoryKeyValueStore;
