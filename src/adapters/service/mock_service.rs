//! Mock Decision Service for testing.
//!
//! Provides a configurable mock implementation of the DecisionService port,
//! allowing tests to run without a real decision service.
//!
//! # Features
//!
//! - Pre-configured responses, consumed in order per endpoint
//! - Error injection
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let service = MockDecisionService::new()
//!     .with_questions(GeneratedQuestions { .. })
//!     .with_decision_error(ServiceError::status(500, "Internal Server Error", ""));
//!
//! manager.generate_questions().await;
//! assert_eq!(service.questions_calls().len(), 1);
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::domain::decision::Decision;
use crate::ports::{
    DecisionRequest, DecisionService, GeneratedQuestions, QuestionsRequest, ServiceError,
};

/// Mock decision service.
///
/// Clones share queues and call history.
#[derive(Debug, Clone, Default)]
pub struct MockDecisionService {
    questions: Arc<Mutex<VecDeque<Result<GeneratedQuestions, ServiceError>>>>,
    decisions: Arc<Mutex<VecDeque<Result<Decision, ServiceError>>>>,
    questions_calls: Arc<Mutex<Vec<QuestionsRequest>>>,
    decision_calls: Arc<Mutex<Vec<DecisionRequest>>>,
}

impl MockDecisionService {
    /// Creates a mock with empty queues.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful question generation.
    pub fn with_questions(self, response: GeneratedQuestions) -> Self {
        self.questions.lock().unwrap().push_back(Ok(response));
        self
    }

    /// Queues a failed question generation.
    pub fn with_questions_error(self, error: ServiceError) -> Self {
        self.questions.lock().unwrap().push_back(Err(error));
        self
    }

    /// Queues a successful decision.
    pub fn with_decision(self, decision: Decision) -> Self {
        self.decisions.lock().unwrap().push_back(Ok(decision));
        self
    }

    /// Queues a failed decision.
    pub fn with_decision_error(self, error: ServiceError) -> Self {
        self.decisions.lock().unwrap().push_back(Err(error));
        self
    }

    /// Question requests received so far.
    pub fn questions_calls(&self) -> Vec<QuestionsRequest> {
        self.questions_calls.lock().unwrap().clone()
    }

    /// Decision requests received so far.
    pub fn decision_calls(&self) -> Vec<DecisionRequest> {
        self.decision_calls.lock().unwrap().clone()
    }

    fn exhausted(endpoint: &str) -> ServiceError {
        ServiceError::network(format!("mock has no queued {} response", endpoint))
    }
}

#[async_trait]
impl DecisionService for MockDecisionService {
    async fn generate_questions(
        &self,
        request: QuestionsRequest,
    ) -> Result<GeneratedQuestions, ServiceError> {
        self.questions_calls.lock().unwrap().push(request);
        self.questions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Self::exhausted("questions")))
    }

    async fn generate_decision(&self, request: DecisionRequest) -> Result<Decision, ServiceError> {
        self.decision_calls.lock().unwrap().push(request);
        self.decisions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Self::exhausted("decision")))
    }
}
