//! Decision Service Adapters.
//!
//! Implementations of the DecisionService port.
//!
//! ## Available Adapters
//!
//! - `HttpDecisionService` - JSON over HTTP via reqwest
//! - `MockDecisionService` - Configurable mock for testing

mod dto;
mod http_service;
mod mock_service;

pub use http_service::{HttpDecisionService, HttpServiceConfig};
pub use mock_service::MockDecisionService;
