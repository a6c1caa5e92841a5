//! HTTP Decision Service - Implementation of DecisionService over JSON/HTTP.
//!
//! # Configuration
//!
//! ```ignore
//! let config = HttpServiceConfig::new("http://localhost:8000")
//!     .with_timeout(Duration::from_secs(90))
//!     .with_search_field(SearchFieldName::WebSearchContent);
//!
//! let service = HttpDecisionService::new(config)?;
//! ```
//!
//! # Endpoints
//!
//! - `POST {base_url}/generate-questions`
//! - `POST {base_url}/generate-decision`
//!
//! Any non-2xx status is a failure. No timeout is applied unless one is
//! configured.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::dto::{DecisionRequestBody, QuestionsResponseBody};
use crate::config::{SearchFieldName, ServiceConfig};
use crate::domain::decision::Decision;
use crate::ports::{
    DecisionRequest, DecisionService, GeneratedQuestions, QuestionsRequest, ServiceError,
};

/// Configuration for the HTTP decision service.
#[derive(Debug, Clone)]
pub struct HttpServiceConfig {
    /// Base URL of the service (default: http://localhost:8000).
    pub base_url: String,
    /// Optional request timeout.
    pub timeout: Option<Duration>,
    /// Wire name of the search token on decision requests.
    pub search_field: SearchFieldName,
}

impl HttpServiceConfig {
    /// Creates a configuration for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
            search_field: SearchFieldName::default(),
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the search token field name.
    pub fn with_search_field(mut self, search_field: SearchFieldName) -> Self {
        self.search_field = search_field;
        self
    }
}

impl From<&ServiceConfig> for HttpServiceConfig {
    fn from(config: &ServiceConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout: config.timeout(),
            search_field: config.search_field,
        }
    }
}

/// Decision service reached over HTTP.
pub struct HttpDecisionService {
    config: HttpServiceConfig,
    client: Client,
}

impl HttpDecisionService {
    /// Creates a new service client with the given configuration.
    pub fn new(config: HttpServiceConfig) -> Result<Self, ServiceError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ServiceError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Posts a JSON body and decodes a JSON response.
    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ServiceError>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let response = Self::check_status(response).await?;

        let text = response
            .text()
            .await
            .map_err(|e| ServiceError::network(e.to_string()))?;

        serde_json::from_str(&text).map_err(|e| ServiceError::invalid_response(e.to_string()))
    }

    fn map_send_error(&self, e: reqwest::Error) -> ServiceError {
        if e.is_timeout() {
            ServiceError::Timeout {
                timeout_secs: self.config.timeout.map(|t| t.as_secs()).unwrap_or_default(),
            }
        } else if e.is_connect() {
            ServiceError::network(format!("Connection failed: {}", e))
        } else {
            ServiceError::network(e.to_string())
        }
    }

    async fn check_status(response: Response) -> Result<Response, ServiceError> {
        let status = response.status();
        debug!("Response status: {}", status);

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!("Decision service returned {}: {}", status, body);

        Err(ServiceError::status(
            status.as_u16(),
            status.canonical_reason().unwrap_or_default(),
            body,
        ))
    }
}

#[async_trait]
impl DecisionService for HttpDecisionService {
    async fn generate_questions(
        &self,
        request: QuestionsRequest,
    ) -> Result<GeneratedQuestions, ServiceError> {
        let body: QuestionsResponseBody = self.post_json("generate-questions", &request).await?;
        Ok(body.into())
    }

    async fn generate_decision(&self, request: DecisionRequest) -> Result<Decision, ServiceError> {
        let body = DecisionRequestBody::new(&request, self.config.search_field);
        self.post_json("generate-decision", &body).await
    }
}
