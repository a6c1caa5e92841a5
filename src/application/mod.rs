//! Application layer - the decision state manager.
//!
//! Orchestrates the session aggregate, the decision service and the local
//! store.

mod manager;
pub mod snapshot;

pub use manager::{DecisionStateManager, RequestOutcome};
