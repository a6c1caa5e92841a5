//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `decision` - The wizard session: options, questions, answers and the
//!   recommendation, with the rules that keep them consistent

pub mod decision;
