//! Decision session aggregate.
//!
//! Holds everything the wizard collects for one decision and enforces the
//! option rules in one place.
//!
//! # Invariants
//!
//! - There are always at least [`MIN_OPTIONS`] options
//! - All options share one kind (text or image)
//! - Image mode holds at most [`MAX_IMAGE_OPTIONS`] options
//! - Answer indices refer to existing questions

use super::option::{DecisionOption, OptionKind};
use super::question::{AnswerSet, Decision, Question, QuestionAnswerPair};

/// Minimum number of options a session holds.
pub const MIN_OPTIONS: usize = 2;

/// Maximum number of options while in image mode.
pub const MAX_IMAGE_OPTIONS: usize = 3;

/// Wizard page the session is currently on, derived from its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    /// Entering context and options.
    Context,
    /// Answering clarifying questions.
    Questions,
    /// Reading the recommendation.
    Result,
}

/// Session aggregate for one decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionSession {
    context: String,
    options: Vec<DecisionOption>,
    questions: Vec<Question>,
    answers: AnswerSet,
    web_search: String,
    user_id: String,
    decision: Option<Decision>,
}

impl Default for DecisionSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionSession {
    /// Creates an empty session with two blank text options.
    pub fn new() -> Self {
        Self {
            context: String::new(),
            options: default_options(),
            questions: Vec::new(),
            answers: AnswerSet::new(),
            web_search: String::new(),
            user_id: String::new(),
            decision: None,
        }
    }

    /// Rebuilds a session from persisted parts.
    ///
    /// Parts that break the invariants are repaired rather than rejected:
    /// mixed option kinds fall back to the default options, short lists are
    /// padded, image lists are clamped and answers for missing questions
    /// are dropped.
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        context: String,
        options: Vec<DecisionOption>,
        questions: Vec<Question>,
        answers: AnswerSet,
        web_search: String,
        user_id: String,
        decision: Option<Decision>,
    ) -> Self {
        let mut session = Self {
            context,
            options: normalize_options(options),
            questions,
            answers,
            web_search,
            user_id,
            decision,
        };
        session.answers.retain_below(session.questions.len());
        session
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn options(&self) -> &[DecisionOption] {
        &self.options
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    /// Opaque search context returned with the questions.
    pub fn web_search(&self) -> &str {
        &self.web_search
    }

    /// Service-assigned session identifier.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn decision(&self) -> Option<&Decision> {
        self.decision.as_ref()
    }

    /// Returns the kind shared by all options.
    pub fn option_kind(&self) -> OptionKind {
        if self.options.iter().any(DecisionOption::is_image) {
            OptionKind::Image
        } else {
            OptionKind::Text
        }
    }

    pub fn is_image_mode(&self) -> bool {
        self.option_kind() == OptionKind::Image
    }

    /// Number of options with non-empty content.
    pub fn filled_option_count(&self) -> usize {
        self.options.iter().filter(|o| o.has_content()).count()
    }

    /// Payloads of the filled options, as sent to the decision service.
    pub fn service_options(&self) -> Vec<String> {
        self.options
            .iter()
            .filter(|o| o.has_content())
            .map(DecisionOption::service_payload)
            .collect()
    }

    /// Question/answer pairs in question order. Unanswered questions pair
    /// with an empty answer.
    pub fn question_answer_pairs(&self) -> Vec<QuestionAnswerPair> {
        self.questions
            .iter()
            .enumerate()
            .map(|(index, question)| QuestionAnswerPair {
                question: question.prompt().to_string(),
                answer: self.answers.get(index).unwrap_or_default().to_string(),
            })
            .collect()
    }

    /// Whether there is enough input to ask for questions.
    pub fn can_generate_questions(&self) -> bool {
        !self.context.trim().is_empty() && self.filled_option_count() >= MIN_OPTIONS
    }

    /// Whether every question has an answer (false when there are none).
    pub fn all_questions_answered(&self) -> bool {
        !self.questions.is_empty()
            && (0..self.questions.len()).all(|index| self.answers.is_answered(index))
    }

    /// Whether there is enough input to ask for a decision.
    pub fn can_generate_decision(&self) -> bool {
        self.all_questions_answered()
    }

    /// Index of the first question without an answer.
    pub fn first_unanswered(&self) -> Option<usize> {
        (0..self.questions.len()).find(|index| !self.answers.is_answered(*index))
    }

    pub fn current_step(&self) -> WizardStep {
        if self.decision.is_some() {
            WizardStep::Result
        } else if !self.questions.is_empty() {
            WizardStep::Questions
        } else {
            WizardStep::Context
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    //
    // Each returns `true` when the session changed.
    // ─────────────────────────────────────────────────────────────────────────

    pub fn set_context(&mut self, context: impl Into<String>) -> bool {
        let context = context.into();
        if self.context == context {
            return false;
        }
        self.context = context;
        true
    }

    /// Appends an empty option of the current kind.
    pub fn add_option(&mut self) -> bool {
        let kind = self.option_kind();
        if kind == OptionKind::Image && self.options.len() >= MAX_IMAGE_OPTIONS {
            return false;
        }
        self.options.push(DecisionOption::empty(kind));
        true
    }

    /// Removes an option, keeping at least [`MIN_OPTIONS`].
    ///
    /// Removing the last image that had content returns the session to text
    /// mode.
    pub fn remove_option(&mut self, index: usize) -> bool {
        if self.options.len() <= MIN_OPTIONS || index >= self.options.len() {
            return false;
        }
        let removed = self.options.remove(index);
        if removed.is_image() && removed.has_content() && self.filled_option_count() == 0 {
            self.options = default_options();
        }
        true
    }

    /// Replaces the text of an option. Ignored in image mode.
    pub fn update_option(&mut self, index: usize, text: impl Into<String>) -> bool {
        if self.is_image_mode() {
            return false;
        }
        let Some(slot) = self.options.get_mut(index) else {
            return false;
        };
        let text = text.into();
        if slot.content() == text {
            return false;
        }
        *slot = DecisionOption::text(text);
        true
    }

    /// Stores an image in an option slot.
    ///
    /// The first image switches the whole session to image mode: every other
    /// option becomes an empty image slot and the list is truncated to
    /// [`MAX_IMAGE_OPTIONS`]. An index past the truncated list lands in the
    /// last slot.
    pub fn set_image_option(
        &mut self,
        index: usize,
        data_url: impl Into<String>,
        raw: Option<Vec<u8>>,
    ) -> bool {
        let data_url = data_url.into();
        if index >= self.options.len() || data_url.is_empty() {
            return false;
        }

        if !self.is_image_mode() {
            let slots = self.options.len().min(MAX_IMAGE_OPTIONS);
            self.options = vec![DecisionOption::empty_image(); slots];
        }

        let slot = index.min(self.options.len() - 1);
        self.options[slot] = DecisionOption::image(data_url, raw);
        true
    }

    /// Empties one image slot. When no image content remains the session
    /// returns to two empty text options.
    pub fn clear_image_option(&mut self, index: usize) -> bool {
        match self.options.get(index) {
            Some(option) if option.is_image() => {}
            _ => return false,
        }

        self.options[index] = DecisionOption::empty_image();
        if self.filled_option_count() == 0 {
            self.options = default_options();
        }
        true
    }

    /// Resets the options to two empty text entries.
    pub fn switch_to_text_mode(&mut self) -> bool {
        let defaults = default_options();
        if self.options == defaults {
            return false;
        }
        self.options = defaults;
        true
    }

    /// Records an answer. Ignored for unknown questions or choices the
    /// question does not offer.
    pub fn set_answer(&mut self, question: usize, choice: impl Into<String>) -> bool {
        let choice = choice.into();
        match self.questions.get(question) {
            Some(q) if q.has_choice(&choice) => self.answers.set(question, choice),
            _ => false,
        }
    }

    pub fn undo_answer(&mut self, question: usize) -> bool {
        self.answers.remove(question)
    }

    pub fn clear_answers(&mut self) -> bool {
        self.answers.clear()
    }

    /// Stores a fresh question list from the service.
    ///
    /// Answers and any earlier decision belong to the previous list and are
    /// discarded.
    pub fn apply_questions(
        &mut self,
        questions: Vec<Question>,
        web_search: String,
        user_id: String,
    ) {
        self.questions = questions;
        self.web_search = web_search;
        self.user_id = user_id;
        self.answers.clear();
        self.decision = None;
    }

    pub fn apply_decision(&mut self, decision: Decision) {
        self.decision = Some(decision);
    }
}

fn default_options() -> Vec<DecisionOption> {
    vec![DecisionOption::empty_text(); MIN_OPTIONS]
}

fn normalize_options(mut options: Vec<DecisionOption>) -> Vec<DecisionOption> {
    let image_count = options.iter().filter(|o| o.is_image()).count();
    if image_count != 0 && image_count != options.len() {
        return default_options();
    }

    let kind = if image_count > 0 {
        OptionKind::Image
    } else {
        OptionKind::Text
    };

    if kind == OptionKind::Image {
        options.truncate(MAX_IMAGE_OPTIONS);
        if !options.iter().any(DecisionOption::has_content) {
            return default_options();
        }
    }
    while options.len() < MIN_OPTIONS {
        options.push(DecisionOption::empty(kind));
    }
    options
}
