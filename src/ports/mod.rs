//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `DecisionService` - the external question/decision generation service
//! - `KeyValueStore` - local durable storage the session is mirrored to

mod decision_service;
mod key_value_store;

pub use decision_service::{
    DecisionRequest, DecisionService, GeneratedQuestions, QuestionsRequest, ServiceError,
    ServiceOperation,
};
pub use key_value_store::{KeyValueStore, StorageError};
