//! Decision Helper - guided decision wizard client
//!
//! Collects a decision context and candidate options (text or images), asks
//! an external decision service for clarifying questions, records the
//! answers and asks the service for a recommendation. The session is
//! mirrored to a local key-value store after every change.
//!
//! ```no_run
//! use std::sync::Arc;
//! use decision_helper::adapters::{FileKeyValueStore, HttpDecisionService, HttpServiceConfig};
//! use decision_helper::application::DecisionStateManager;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let service = HttpDecisionService::new(HttpServiceConfig::new("http://localhost:8000"))?;
//! let store = FileKeyValueStore::new(".decision-helper");
//! let mut manager = DecisionStateManager::new(
//!     Arc::new(service),
//!     Arc::new(store),
//!     "decision-helper-state",
//! );
//!
//! manager.set_context("best laptop for travel");
//! manager.update_option(0, "Dell XPS 13");
//! manager.update_option(1, "MacBook Air");
//! manager.generate_questions().await;
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
