//! Wire formats of the decision service.

use serde::{Deserialize, Serialize};

use crate::config::SearchFieldName;
use crate::domain::decision::{Question, QuestionAnswerPair};
use crate::ports::{DecisionRequest, GeneratedQuestions};

/// Body of `POST /generate-decision`.
///
/// Exactly one of the two search fields is set, chosen by configuration.
#[derive(Debug, Serialize)]
pub(crate) struct DecisionRequestBody<'a> {
    pub user_id: &'a str,
    pub context: &'a str,
    pub options: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_search: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_search_content: Option<&'a str>,
    pub question_answer_pairs: &'a [QuestionAnswerPair],
}

impl<'a> DecisionRequestBody<'a> {
    pub fn new(request: &'a DecisionRequest, search_field: SearchFieldName) -> Self {
        let search = Some(request.web_search.as_str());
        let (web_search, web_search_content) = match search_field {
            SearchFieldName::WebSearch => (search, None),
            SearchFieldName::WebSearchContent => (None, search),
        };

        Self {
            user_id: &request.user_id,
            context: &request.context,
            options: &request.options,
            web_search,
            web_search_content,
            question_answer_pairs: &request.question_answer_pairs,
        }
    }
}

/// Body returned by `POST /generate-questions`.
///
/// Service variants name the search token `web_search` or
/// `web_search_content`; both land in `web_search`.
#[derive(Debug, Deserialize)]
pub(crate) struct QuestionsResponseBody {
    pub questions: Vec<Question>,
    #[serde(default, alias = "web_search_content")]
    pub web_search: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl From<QuestionsResponseBody> for GeneratedQuestions {
    fn from(body: QuestionsResponseBody) -> Self {
        GeneratedQuestions {
            questions: body.questions,
            web_search: body.web_search.unwrap_or_default(),
            user_id: body.user_id.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decision_request() -> DecisionRequest {
        DecisionRequest {
            user_id: "abc".into(),
            context: "best laptop for travel".into(),
            options: vec!["Dell XPS 13".into(), "MacBook Air".into()],
            web_search: "reviews...".into(),
            question_answer_pairs: vec![QuestionAnswerPair {
                question: "Budget?".into(),
                answer: "$1000-2000".into(),
            }],
        }
    }

    #[test]
    fn decision_body_uses_web_search_by_default_name() {
        let request = decision_request();
        let body = DecisionRequestBody::new(&request, SearchFieldName::WebSearch);

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "user_id": "abc",
                "context": "best laptop for travel",
                "options": ["Dell XPS 13", "MacBook Air"],
                "web_search": "reviews...",
                "question_answer_pairs": [{"question": "Budget?", "answer": "$1000-2000"}]
            })
        );
    }

    #[test]
    fn decision_body_can_use_web_search_content() {
        let request = decision_request();
        let body = DecisionRequestBody::new(&request, SearchFieldName::WebSearchContent);
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["web_search_content"], "reviews...");
        assert!(value.get("web_search").is_none());
    }

    #[test]
    fn questions_response_accepts_either_search_field() {
        let plain: QuestionsResponseBody = serde_json::from_value(json!({
            "questions": [],
            "web_search": "a",
            "user_id": "u"
        }))
        .unwrap();
        assert_eq!(plain.web_search.as_deref(), Some("a"));

        let content: QuestionsResponseBody = serde_json::from_value(json!({
            "questions": [],
            "web_search_content": "b",
            "user_id": "u"
        }))
        .unwrap();
        assert_eq!(content.web_search.as_deref(), Some("b"));
    }

    #[test]
    fn questions_response_defaults_missing_tokens() {
        let body: QuestionsResponseBody = serde_json::from_value(json!({
            "questions": [{"question": "Budget?", "answer_choices": ["low", "high"]}],
            "web_search": null
        }))
        .unwrap();

        let generated = GeneratedQuestions::from(body);
        assert_eq!(generated.questions.len(), 1);
        assert_eq!(generated.web_search, "");
        assert_eq!(generated.user_id, "");
    }

    #[test]
    fn questions_response_requires_question_list() {
        let result: Result<QuestionsResponseBody, _> =
            serde_json::from_value(json!({"web_search": "a", "user_id": "u"}));
        assert!(result.is_err());
    }
}
