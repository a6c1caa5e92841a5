//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `DECISION_HELPER` prefix and nested values use double underscores as separators.
//! Every value has a default, so an empty environment is a valid configuration.
//!
//! # Example
//!
//! ```no_run
//! use decision_helper::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Decision service at {}", config.service.base_url);
//! ```

mod error;
mod logging;
mod service;
mod storage;

pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use service::{SearchFieldName, ServiceConfig};
pub use storage::{StorageConfig, DEFAULT_STORAGE_KEY};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Decision service location and wire options
    #[serde(default)]
    pub service: ServiceConfig,

    /// Where the session is persisted
    #[serde(default)]
    pub storage: StorageConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present
    /// 2. Reads environment variables with `DECISION_HELPER` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `DECISION_HELPER__SERVICE__BASE_URL=...` -> `service.base_url = ...`
    /// - `DECISION_HELPER__STORAGE__DIR=...` -> `storage.dir = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("DECISION_HELPER")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.service.validate()?;
        self.storage.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        env::remove_var("DECISION_HELPER__SERVICE__BASE_URL");
        env::remove_var("DECISION_HELPER__SERVICE__TIMEOUT_SECS");
        env::remove_var("DECISION_HELPER__SERVICE__SEARCH_FIELD");
        env::remove_var("DECISION_HELPER__STORAGE__DIR");
        env::remove_var("DECISION_HELPER__STORAGE__KEY");
        env::remove_var("DECISION_HELPER__LOGGING__JSON");
    }

    #[test]
    fn test_load_defaults_from_empty_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.service.base_url, "http://localhost:8000");
        assert_eq!(config.storage.key, DEFAULT_STORAGE_KEY);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("DECISION_HELPER__SERVICE__BASE_URL", "https://decide.example.com");
        env::set_var("DECISION_HELPER__SERVICE__TIMEOUT_SECS", "30");
        env::set_var("DECISION_HELPER__SERVICE__SEARCH_FIELD", "web_search_content");
        env::set_var("DECISION_HELPER__STORAGE__KEY", "other-state");
        env::set_var("DECISION_HELPER__LOGGING__JSON", "true");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.service.base_url, "https://decide.example.com");
        assert_eq!(config.service.timeout_secs, Some(30));
        assert_eq!(
            config.service.search_field,
            SearchFieldName::WebSearchContent
        );
        assert_eq!(config.storage.key, "other-state");
        assert!(config.logging.json);
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("DECISION_HELPER__SERVICE__BASE_URL", "localhost:8000");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.validate().is_err());
    }
}
