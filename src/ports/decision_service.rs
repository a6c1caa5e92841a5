//! Decision Service Port - Interface to the external decision-generation service.
//!
//! The service is opaque to this crate. It receives the decision context and
//! options, answers with clarifying questions, then receives the answers and
//! answers with a recommendation.
//!
//! # Design
//!
//! - Requests are immutable snapshots taken from the session before the call
//! - Responses are returned in domain types; wire formats live in the adapter
//! - Every failure is a [`ServiceError`]; the state manager turns it into a
//!   user-facing message

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

use crate::domain::decision::{Decision, Question, QuestionAnswerPair};

/// Port for the external decision service.
#[async_trait]
pub trait DecisionService: Send + Sync {
    /// Ask for clarifying questions about the context and options.
    async fn generate_questions(
        &self,
        request: QuestionsRequest,
    ) -> Result<GeneratedQuestions, ServiceError>;

    /// Ask for a recommendation given the answered questions.
    async fn generate_decision(&self, request: DecisionRequest) -> Result<Decision, ServiceError>;
}

/// Snapshot sent to question generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionsRequest {
    pub context: String,
    /// Filled options only: text as typed, images as bare base64.
    pub options: Vec<String>,
}

/// Snapshot sent to decision generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionRequest {
    pub user_id: String,
    pub context: String,
    pub options: Vec<String>,
    /// Echoed back verbatim from [`GeneratedQuestions::web_search`].
    pub web_search: String,
    pub question_answer_pairs: Vec<QuestionAnswerPair>,
}

/// What question generation returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedQuestions {
    pub questions: Vec<Question>,
    pub web_search: String,
    pub user_id: String,
}

/// Which service call an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceOperation {
    GenerateQuestions,
    GenerateDecision,
}

impl fmt::Display for ServiceOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceOperation::GenerateQuestions => write!(f, "generate questions"),
            ServiceOperation::GenerateDecision => write!(f, "generate decision"),
        }
    }
}

/// Errors from the decision service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Service returned {status} {reason}")]
    Status {
        status: u16,
        reason: String,
        body: String,
    },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ServiceError {
    pub fn network(message: impl Into<String>) -> Self {
        ServiceError::Network(message.into())
    }

    pub fn status(status: u16, reason: impl Into<String>, body: impl Into<String>) -> Self {
        ServiceError::Status {
            status,
            reason: reason.into(),
            body: body.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        ServiceError::InvalidResponse(message.into())
    }

    /// Message shown to the user when `operation` fails with this error.
    pub fn user_message(&self, operation: ServiceOperation) -> String {
        match self {
            ServiceError::Network(message) => {
                format!("An error occurred while connecting to the server: {}", message)
            }
            ServiceError::Timeout { timeout_secs } => {
                format!(
                    "Failed to {}: request timed out after {}s",
                    operation, timeout_secs
                )
            }
            ServiceError::Status { status, reason, .. } => {
                format!("Failed to {}: {} {}", operation, status, reason)
                    .trim_end()
                    .to_string()
            }
            ServiceError::InvalidResponse(message) => {
                format!("Failed to {}: unexpected response ({})", operation, message)
            }
        }
    }
}
