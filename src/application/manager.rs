//! DecisionStateManager - owns the wizard session and everything it talks to.
//!
//! The manager is the only writer of the [`DecisionSession`]. Views read it
//! through [`DecisionStateManager::session`] and change it by dispatching
//! [`SessionAction`]s or calling the service operations.
//!
//! Every change is written to the key-value store straight away. Service and
//! storage failures stop here: service failures become the message returned
//! by [`DecisionStateManager::error`], storage failures are logged.

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::snapshot;
use crate::domain::decision::{Decision, DecisionSession, ImageFile, SessionAction};
use crate::ports::{
    DecisionRequest, DecisionService, GeneratedQuestions, KeyValueStore, QuestionsRequest,
    ServiceError, ServiceOperation,
};

/// What happened to a service request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Preconditions were not met or a request was already loading; nothing
    /// was sent.
    NotReady,
    /// The service answered and the session was updated.
    Completed,
    /// The request failed; see [`DecisionStateManager::error`].
    Failed,
}

/// Owns the decision session, its persistence and the service calls.
pub struct DecisionStateManager {
    session: DecisionSession,
    loading: bool,
    error: Option<String>,
    service: Arc<dyn DecisionService>,
    store: Arc<dyn KeyValueStore>,
    storage_key: String,
}

impl DecisionStateManager {
    /// Creates a manager, restoring any session saved under `storage_key`.
    ///
    /// A missing, unreadable or malformed saved session never fails startup;
    /// the affected parts start from their defaults.
    pub fn new(
        service: Arc<dyn DecisionService>,
        store: Arc<dyn KeyValueStore>,
        storage_key: impl Into<String>,
    ) -> Self {
        let storage_key = storage_key.into();
        let session = match store.get(&storage_key) {
            Ok(Some(raw)) => snapshot::decode(&raw),
            Ok(None) => DecisionSession::new(),
            Err(e) => {
                warn!("Could not read saved session '{}': {}", storage_key, e);
                DecisionSession::new()
            }
        };

        Self {
            session,
            loading: false,
            error: None,
            service,
            store,
            storage_key,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn session(&self) -> &DecisionSession {
        &self.session
    }

    /// Whether a service request is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message from the last failed service request, cleared when the next
    /// one starts.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn can_generate_questions(&self) -> bool {
        !self.loading && self.session.can_generate_questions()
    }

    pub fn can_generate_decision(&self) -> bool {
        !self.loading && self.session.can_generate_decision()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Actions
    // ─────────────────────────────────────────────────────────────────────────

    /// Applies an action and persists the session if it changed.
    ///
    /// Returns `true` if the session changed.
    pub fn dispatch(&mut self, action: SessionAction) -> bool {
        let name = action.name();
        let changed = action.apply(&mut self.session);
        debug!(action = name, changed, "dispatch");
        if changed {
            self.persist();
        }
        changed
    }

    pub fn set_context(&mut self, text: impl Into<String>) -> bool {
        self.dispatch(SessionAction::SetContext(text.into()))
    }

    pub fn add_option(&mut self) -> bool {
        self.dispatch(SessionAction::AddOption)
    }

    pub fn remove_option(&mut self, index: usize) -> bool {
        self.dispatch(SessionAction::RemoveOption(index))
    }

    pub fn update_option(&mut self, index: usize, text: impl Into<String>) -> bool {
        self.dispatch(SessionAction::UpdateOption {
            index,
            text: text.into(),
        })
    }

    /// Encodes an image off the async runtime and stores it in an option
    /// slot. The first image switches the session to image mode.
    pub async fn update_image_option(&mut self, index: usize, image: ImageFile) -> bool {
        let encoded = tokio::task::spawn_blocking(move || {
            let data_url = image.to_data_url();
            (data_url, image.bytes)
        })
        .await;

        match encoded {
            Ok((data_url, bytes)) => self.dispatch(SessionAction::SetImageOption {
                index,
                data_url,
                raw: Some(bytes),
            }),
            Err(e) => {
                warn!("Image encoding failed: {}", e);
                self.error = Some(format!("Failed to read image: {}", e));
                false
            }
        }
    }

    pub fn clear_image_option(&mut self, index: usize) -> bool {
        self.dispatch(SessionAction::ClearImageOption(index))
    }

    pub fn switch_to_text_mode(&mut self) -> bool {
        self.dispatch(SessionAction::SwitchToTextMode)
    }

    pub fn set_answer(&mut self, question: usize, choice: impl Into<String>) -> bool {
        self.dispatch(SessionAction::SetAnswer {
            question,
            choice: choice.into(),
        })
    }

    pub fn undo_answer(&mut self, question: usize) -> bool {
        self.dispatch(SessionAction::UndoAnswer(question))
    }

    pub fn clear_all_answers(&mut self) -> bool {
        self.dispatch(SessionAction::ClearAnswers)
    }

    /// Clears the whole session and removes it from storage.
    pub fn reset(&mut self) {
        self.session = DecisionSession::new();
        self.error = None;
        if let Err(e) = self.store.remove(&self.storage_key) {
            warn!("Failed to remove saved session '{}': {}", self.storage_key, e);
        }
        info!("Session reset");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Service requests
    // ─────────────────────────────────────────────────────────────────────────

    /// Starts a question request: checks preconditions, sets the loading
    /// flag, clears the error and returns the request snapshot.
    ///
    /// Returns `None` without side effects when the request cannot be made.
    pub fn prepare_questions_request(&mut self) -> Option<QuestionsRequest> {
        if !self.can_generate_questions() {
            return None;
        }
        self.loading = true;
        self.error = None;

        Some(QuestionsRequest {
            context: self.session.context().to_string(),
            options: self.session.service_options(),
        })
    }

    /// Finishes a question request started with
    /// [`prepare_questions_request`](Self::prepare_questions_request).
    pub fn complete_questions_request(
        &mut self,
        outcome: Result<GeneratedQuestions, ServiceError>,
    ) -> RequestOutcome {
        self.loading = false;
        match outcome {
            Ok(generated) => {
                info!(
                    questions = generated.questions.len(),
                    "Received clarifying questions"
                );
                self.session
                    .apply_questions(generated.questions, generated.web_search, generated.user_id);
                self.persist();
                RequestOutcome::Completed
            }
            Err(e) => self.fail(ServiceOperation::GenerateQuestions, e),
        }
    }

    /// Asks the service for clarifying questions.
    pub async fn generate_questions(&mut self) -> RequestOutcome {
        let Some(request) = self.prepare_questions_request() else {
            return RequestOutcome::NotReady;
        };
        let service = Arc::clone(&self.service);
        let outcome = service.generate_questions(request).await;
        self.complete_questions_request(outcome)
    }

    /// Starts a decision request. Every question must be answered.
    ///
    /// Returns `None` without side effects when the request cannot be made.
    pub fn prepare_decision_request(&mut self) -> Option<DecisionRequest> {
        if !self.can_generate_decision() {
            return None;
        }
        self.loading = true;
        self.error = None;

        Some(DecisionRequest {
            user_id: self.session.user_id().to_string(),
            context: self.session.context().to_string(),
            options: self.session.service_options(),
            web_search: self.session.web_search().to_string(),
            question_answer_pairs: self.session.question_answer_pairs(),
        })
    }

    /// Finishes a decision request started with
    /// [`prepare_decision_request`](Self::prepare_decision_request).
    pub fn complete_decision_request(
        &mut self,
        outcome: Result<Decision, ServiceError>,
    ) -> RequestOutcome {
        self.loading = false;
        match outcome {
            Ok(decision) => {
                info!(chosen = %decision.chosen_option, "Received decision");
                self.session.apply_decision(decision);
                self.persist();
                RequestOutcome::Completed
            }
            Err(e) => self.fail(ServiceOperation::GenerateDecision, e),
        }
    }

    /// Asks the service for a recommendation.
    pub async fn generate_decision(&mut self) -> RequestOutcome {
        let Some(request) = self.prepare_decision_request() else {
            return RequestOutcome::NotReady;
        };
        let service = Arc::clone(&self.service);
        let outcome = service.generate_decision(request).await;
        self.complete_decision_request(outcome)
    }

    fn fail(&mut self, operation: ServiceOperation, error: ServiceError) -> RequestOutcome {
        warn!("Failed to {}: {}", operation, error);
        self.error = Some(error.user_message(operation));
        RequestOutcome::Failed
    }

    fn persist(&self) {
        let encoded = match snapshot::encode(&self.session) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!("Failed to serialize session: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.set(&self.storage_key, &encoded) {
            warn!("Failed to save session '{}': {}", self.storage_key, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryKeyValueStore, MockDecisionService};
    use crate::domain::decision::{Question, WizardStep};

    const KEY: &str = "decision-helper-state";

    fn manager_with(
        service: MockDecisionService,
        store: InMemoryKeyValueStore,
    ) -> DecisionStateManager {
        DecisionStateManager::new(Arc::new(service), Arc::new(store), KEY)
    }

    fn budget_questions(user_id: &str) -> GeneratedQuestions {
        GeneratedQuestions {
            questions: vec![Question::new(
                "Budget?",
                vec!["<$1000".into(), "$1000-2000".into(), ">$2000".into()],
            )],
            web_search: "...".into(),
            user_id: user_id.into(),
        }
    }

    fn fill_laptop_inputs(manager: &mut DecisionStateManager) {
        manager.set_context("best laptop for travel");
        manager.update_option(0, "Dell XPS 13");
        manager.update_option(1, "MacBook Air");
    }

    #[tokio::test]
    async fn generate_questions_sends_filtered_options_and_stores_result() {
        let service = MockDecisionService::new().with_questions(budget_questions("abc"));
        let mut manager = manager_with(service.clone(), InMemoryKeyValueStore::new());
        fill_laptop_inputs(&mut manager);
        manager.add_option();

        let outcome = manager.generate_questions().await;

        assert_eq!(outcome, RequestOutcome::Completed);
        let calls = service.questions_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].context, "best laptop for travel");
        assert_eq!(calls[0].options, vec!["Dell XPS 13", "MacBook Air"]);
        assert_eq!(manager.session().questions().len(), 1);
        assert_eq!(manager.session().user_id(), "abc");
        assert_eq!(manager.session().current_step(), WizardStep::Questions);
        assert!(!manager.is_loading());
    }

    #[tokio::test]
    async fn generate_questions_is_noop_without_enough_input() {
        let service = MockDecisionService::new().with_questions(budget_questions("abc"));
        let mut manager = manager_with(service.clone(), InMemoryKeyValueStore::new());

        manager.update_option(0, "Dell XPS 13");
        manager.update_option(1, "MacBook Air");
        assert_eq!(manager.generate_questions().await, RequestOutcome::NotReady);

        manager.set_context("best laptop for travel");
        manager.update_option(1, "");
        assert_eq!(manager.generate_questions().await, RequestOutcome::NotReady);

        assert!(service.questions_calls().is_empty());
        assert!(!manager.is_loading());
    }

    #[tokio::test]
    async fn failed_questions_request_sets_error_and_keeps_state() {
        let service = MockDecisionService::new().with_questions_error(ServiceError::status(
            500,
            "Internal Server Error",
            "boom",
        ));
        let mut manager = manager_with(service, InMemoryKeyValueStore::new());
        fill_laptop_inputs(&mut manager);

        let outcome = manager.generate_questions().await;

        assert_eq!(outcome, RequestOutcome::Failed);
        assert!(!manager.error().unwrap_or_default().is_empty());
        assert!(!manager.is_loading());
        assert!(manager.session().questions().is_empty());
    }

    #[tokio::test]
    async fn failed_request_leaves_previous_questions_and_answers() {
        let service = MockDecisionService::new()
            .with_questions(budget_questions("abc"))
            .with_questions_error(ServiceError::network("connection reset"));
        let mut manager = manager_with(service, InMemoryKeyValueStore::new());
        fill_laptop_inputs(&mut manager);

        manager.generate_questions().await;
        manager.set_answer(0, "<$1000");
        manager.generate_questions().await;

        assert!(manager.error().is_some());
        assert_eq!(manager.session().questions().len(), 1);
        assert_eq!(manager.session().answers().get(0), Some("<$1000"));
    }

    #[tokio::test]
    async fn next_request_clears_previous_error() {
        let service = MockDecisionService::new()
            .with_questions_error(ServiceError::network("down"))
            .with_questions(budget_questions("abc"));
        let mut manager = manager_with(service, InMemoryKeyValueStore::new());
        fill_laptop_inputs(&mut manager);

        manager.generate_questions().await;
        assert!(manager.error().is_some());

        manager.generate_questions().await;
        assert!(manager.error().is_none());
    }

    #[tokio::test]
    async fn generate_decision_echoes_user_and_search_token() {
        let service = MockDecisionService::new()
            .with_questions(budget_questions("abc"))
            .with_decision(Decision {
                chosen_option: "MacBook Air".into(),
                reason: "Lighter and within budget".into(),
                user_id: "abc".into(),
            });
        let mut manager = manager_with(service.clone(), InMemoryKeyValueStore::new());
        fill_laptop_inputs(&mut manager);
        manager.generate_questions().await;

        assert_eq!(manager.generate_decision().await, RequestOutcome::NotReady);

        manager.set_answer(0, "$1000-2000");
        assert_eq!(manager.generate_decision().await, RequestOutcome::Completed);

        let calls = service.decision_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].user_id, "abc");
        assert_eq!(calls[0].web_search, "...");
        assert_eq!(calls[0].question_answer_pairs[0].question, "Budget?");
        assert_eq!(calls[0].question_answer_pairs[0].answer, "$1000-2000");

        let decision = manager.session().decision().unwrap();
        assert_eq!(decision.chosen_option, "MacBook Air");
        assert_eq!(manager.session().current_step(), WizardStep::Result);
    }

    #[tokio::test]
    async fn failed_decision_sets_error() {
        let service = MockDecisionService::new()
            .with_questions(budget_questions("abc"))
            .with_decision_error(ServiceError::status(502, "Bad Gateway", ""));
        let mut manager = manager_with(service, InMemoryKeyValueStore::new());
        fill_laptop_inputs(&mut manager);
        manager.generate_questions().await;
        manager.set_answer(0, ">$2000");

        assert_eq!(manager.generate_decision().await, RequestOutcome::Failed);
        assert_eq!(
            manager.error(),
            Some("Failed to generate decision: 502 Bad Gateway")
        );
        assert!(manager.session().decision().is_none());
        assert!(!manager.is_loading());
    }

    #[test]
    fn prepare_refuses_while_loading() {
        let mut manager =
            manager_with(MockDecisionService::new(), InMemoryKeyValueStore::new());
        fill_laptop_inputs(&mut manager);

        assert!(manager.prepare_questions_request().is_some());
        assert!(manager.is_loading());
        assert!(manager.prepare_questions_request().is_none());

        manager.complete_questions_request(Ok(budget_questions("abc")));
        assert!(!manager.is_loading());
    }

    #[test]
    fn every_change_is_persisted() {
        let store = InMemoryKeyValueStore::new();
        let mut manager = manager_with(MockDecisionService::new(), store.clone());
        assert!(store.get(KEY).unwrap().is_none());

        manager.set_context("travel");
        let saved = store.get(KEY).unwrap().unwrap();
        assert!(saved.contains("\"context\":\"travel\""));

        manager.add_option();
        let restored = manager_with(MockDecisionService::new(), store.clone());
        assert_eq!(restored.session().options().len(), 3);
        assert_eq!(restored.session().context(), "travel");
    }

    #[test]
    fn unchanged_actions_do_not_write() {
        let store = InMemoryKeyValueStore::new();
        let mut manager = manager_with(MockDecisionService::new(), store.clone());

        assert!(!manager.remove_option(0));
        assert!(store.is_empty());
    }

    #[test]
    fn undo_answer_after_set_answer_removes_entry() {
        let mut manager =
            manager_with(MockDecisionService::new(), InMemoryKeyValueStore::new());
        fill_laptop_inputs(&mut manager);
        manager.prepare_questions_request();
        manager.complete_questions_request(Ok(GeneratedQuestions {
            questions: vec![Question::new("Pick", vec!["X".into(), "Y".into()])],
            web_search: String::new(),
            user_id: String::new(),
        }));

        manager.set_answer(0, "X");
        manager.undo_answer(0);

        assert!(!manager.session().answers().is_answered(0));
    }

    #[test]
    fn clear_all_answers_empties_answer_set() {
        let mut manager =
            manager_with(MockDecisionService::new(), InMemoryKeyValueStore::new());
        fill_laptop_inputs(&mut manager);
        manager.prepare_questions_request();
        manager.complete_questions_request(Ok(budget_questions("abc")));
        manager.set_answer(0, "<$1000");

        assert!(manager.clear_all_answers());
        assert!(manager.session().answers().is_empty());
    }

    #[tokio::test]
    async fn image_upload_switches_to_image_mode() {
        let mut manager =
            manager_with(MockDecisionService::new(), InMemoryKeyValueStore::new());
        fill_laptop_inputs(&mut manager);
        manager.add_option();
        manager.add_option();

        let image = ImageFile::new("a.png", "image/png", b"hello".to_vec());
        assert!(manager.update_image_option(0, image).await);

        let options = manager.session().options();
        assert_eq!(options.len(), 3);
        assert!(options.iter().all(|o| o.is_image()));
        assert_eq!(options[0].content(), "data:image/png;base64,aGVsbG8=");
        assert_eq!(options[0].raw_bytes(), Some(&b"hello"[..]));
        assert!(!manager.update_option(1, "text"));
    }

    #[test]
    fn reset_clears_session_and_storage() {
        let store = InMemoryKeyValueStore::new();
        let mut manager = manager_with(MockDecisionService::new(), store.clone());
        fill_laptop_inputs(&mut manager);
        manager.prepare_questions_request();
        manager.complete_questions_request(Err(ServiceError::network("down")));
        assert!(manager.error().is_some());

        manager.reset();

        assert_eq!(manager.session(), &DecisionSession::new());
        assert!(manager.error().is_none());
        assert!(store.get(KEY).unwrap().is_none());
    }
}
