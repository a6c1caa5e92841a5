//! Decision service configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Decision service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the decision service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Optional request timeout in seconds. Unset means requests may wait
    /// indefinitely.
    pub timeout_secs: Option<u64>,

    /// Wire name of the search token on decision requests
    #[serde(default)]
    pub search_field: SearchFieldName,
}

/// Field name the decision service expects for the search token.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SearchFieldName {
    #[default]
    WebSearch,
    WebSearchContent,
}

impl ServiceConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Validate service configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ValidationError::InvalidServiceUrl);
        }
        if self.timeout_secs == Some(0) {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
            search_field: SearchFieldName::default(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}
