//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `service` - Decision service clients (HTTP, mock)
//! - `storage` - Key-value stores (file, in-memory)
//! - `image` - Loading image files for image options

pub mod image;
pub mod service;
pub mod storage;

pub use image::{load_image, ImageError};
pub use service::{HttpDecisionService, HttpServiceConfig, MockDecisionService};
pub use storage::{FileKeyValueStore, InMemoryKeyValueStore};
