//! Session actions.
//!
//! Every user-driven change to a [`DecisionSession`] is expressed as a
//! `SessionAction` and applied through [`SessionAction::apply`], so views
//! never touch session fields directly.

use super::session::DecisionSession;

/// A user-driven change to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    SetContext(String),
    AddOption,
    RemoveOption(usize),
    UpdateOption {
        index: usize,
        text: String,
    },
    /// Store an already-encoded image. Produced by the manager once encoding
    /// has finished.
    SetImageOption {
        index: usize,
        data_url: String,
        raw: Option<Vec<u8>>,
    },
    ClearImageOption(usize),
    SwitchToTextMode,
    SetAnswer {
        question: usize,
        choice: String,
    },
    UndoAnswer(usize),
    ClearAnswers,
}

impl SessionAction {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            SessionAction::SetContext(_) => "set_context",
            SessionAction::AddOption => "add_option",
            SessionAction::RemoveOption(_) => "remove_option",
            SessionAction::UpdateOption { .. } => "update_option",
            SessionAction::SetImageOption { .. } => "set_image_option",
            SessionAction::ClearImageOption(_) => "clear_image_option",
            SessionAction::SwitchToTextMode => "switch_to_text_mode",
            SessionAction::SetAnswer { .. } => "set_answer",
            SessionAction::UndoAnswer(_) => "undo_answer",
            SessionAction::ClearAnswers => "clear_answers",
        }
    }

    /// Applies the action. Returns `true` if the session changed.
    pub fn apply(self, session: &mut DecisionSession) -> bool {
        match self {
            SessionAction::SetContext(text) => session.set_context(text),
            SessionAction::AddOption => session.add_option(),
            SessionAction::RemoveOption(index) => session.remove_option(index),
            SessionAction::UpdateOption { index, text } => session.update_option(index, text),
            SessionAction::SetImageOption {
                index,
                data_url,
                raw,
            } => session.set_image_option(index, data_url, raw),
            SessionAction::ClearImageOption(index) => session.clear_image_option(index),
            SessionAction::SwitchToTextMode => session.switch_to_text_mode(),
            SessionAction::SetAnswer { question, choice } => session.set_answer(question, choice),
            SessionAction::UndoAnswer(question) => session.undo_answer(question),
            SessionAction::ClearAnswers => session.clear_answers(),
        }
    }
}
