//! Persisted session snapshot.
//!
//! The session is stored as one JSON object:
//!
//! ```json
//! {
//!   "context": "best laptop for travel",
//!   "options": [{"type": "text", "content": "Dell XPS 13"}, ...],
//!   "questions": [{"question": "Budget?", "answer_choices": ["..."]}],
//!   "answers": {"0": "$1000-2000"},
//!   "webSearch": "...",
//!   "userId": "abc",
//!   "decision": null
//! }
//! ```
//!
//! Decoding never fails. Each field is read on its own and falls back to its
//! default when missing or malformed, so a snapshot from an older schema
//! still restores as much as it can. Options stored as a plain list of
//! strings are read as text options.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::domain::decision::{
    AnswerSet, Decision, DecisionOption, DecisionSession, Question,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PersistedSession<'a> {
    context: &'a str,
    options: &'a [DecisionOption],
    questions: &'a [Question],
    answers: &'a AnswerSet,
    web_search: &'a str,
    user_id: &'a str,
    decision: Option<&'a Decision>,
}

/// Serializes a session. Raw image bytes are not included.
pub fn encode(session: &DecisionSession) -> Result<String, serde_json::Error> {
    serde_json::to_string(&PersistedSession {
        context: session.context(),
        options: session.options(),
        questions: session.questions(),
        answers: session.answers(),
        web_search: session.web_search(),
        user_id: session.user_id(),
        decision: session.decision(),
    })
}

/// Restores a session from a stored snapshot.
pub fn decode(raw: &str) -> DecisionSession {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!("Discarding unreadable saved session: {}", e);
            return DecisionSession::new();
        }
    };

    let Value::Object(fields) = value else {
        warn!("Discarding saved session that is not a JSON object");
        return DecisionSession::new();
    };

    DecisionSession::reconstitute(
        field(&fields, "context"),
        options_field(&fields),
        field(&fields, "questions"),
        field(&fields, "answers"),
        field(&fields, "webSearch"),
        field(&fields, "userId"),
        field(&fields, "decision"),
    )
}

/// Reads one field, falling back to its default if absent, null or malformed.
fn field<T>(fields: &Map<String, Value>, name: &str) -> T
where
    T: DeserializeOwned + Default,
{
    match fields.get(name) {
        None | Some(Value::Null) => T::default(),
        Some(value) => serde_json::from_value(value.clone()).unwrap_or_else(|e| {
            warn!("Ignoring malformed saved field '{}': {}", name, e);
            T::default()
        }),
    }
}

fn options_field(fields: &Map<String, Value>) -> Vec<DecisionOption> {
    let Some(Value::Array(items)) = fields.get("options") else {
        return Vec::new();
    };

    let parsed: Option<Vec<DecisionOption>> = items.iter().map(parse_option).collect();
    parsed.unwrap_or_else(|| {
        warn!("Ignoring malformed saved options");
        Vec::new()
    })
}

fn parse_option(item: &Value) -> Option<DecisionOption> {
    match item {
        Value::String(text) => Some(DecisionOption::text(text.clone())),
        other => serde_json::from_value(other.clone()).ok(),
    }
}
