//! Clarifying questions, the user's answers, and the final recommendation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A clarifying question returned by the decision service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question")]
    prompt: String,
    #[serde(rename = "answer_choices", default)]
    choices: Vec<String>,
}

impl Question {
    pub fn new(prompt: impl Into<String>, choices: Vec<String>) -> Self {
        Self {
            prompt: prompt.into(),
            choices,
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn has_choice(&self, choice: &str) -> bool {
        self.choices.iter().any(|c| c == choice)
    }
}

/// Answers keyed by 0-based question index.
///
/// A missing entry means the question is unanswered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet(BTreeMap<usize, String>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, question: usize) -> Option<&str> {
        self.0.get(&question).map(String::as_str)
    }

    pub fn is_answered(&self, question: usize) -> bool {
        self.0.contains_key(&question)
    }

    /// Records an answer. Returns `true` if the stored value changed.
    pub fn set(&mut self, question: usize, choice: impl Into<String>) -> bool {
        let choice = choice.into();
        if self.get(question) == Some(choice.as_str()) {
            return false;
        }
        self.0.insert(question, choice);
        true
    }

    /// Deletes an answer. Returns `true` if one was present.
    pub fn remove(&mut self, question: usize) -> bool {
        self.0.remove(&question).is_some()
    }

    pub fn clear(&mut self) -> bool {
        let had_any = !self.0.is_empty();
        self.0.clear();
        had_any
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Drops answers whose index is not below `question_count`.
    pub(crate) fn retain_below(&mut self, question_count: usize) {
        self.0.retain(|index, _| *index < question_count);
    }
}

/// A question paired with the user's answer, in question order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionAnswerPair {
    pub question: String,
    pub answer: String,
}

/// The recommendation returned by the decision service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub chosen_option: String,
    pub reason: String,
    #[serde(default)]
    pub user_id: String,
}
