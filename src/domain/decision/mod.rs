//! Decision domain module.
//!
//! The wizard's state for a single decision: the context, the candidate
//! options, the clarifying questions with their answers, and the final
//! recommendation.

mod action;
mod image;
mod option;
mod question;
mod session;

pub use action::SessionAction;
pub use image::ImageFile;
pub use option::{DecisionOption, OptionKind};
pub use question::{AnswerSet, Decision, Question, QuestionAnswerPair};
pub use session::{DecisionSession, WizardStep, MAX_IMAGE_OPTIONS, MIN_OPTIONS};
