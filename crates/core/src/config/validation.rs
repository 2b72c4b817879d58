//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::{AppConfig, MAX_RESULTS_LIMIT};
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `default_region` is blank
    /// - `default_max_results` is 0 or exceeds 50
    /// - `base_url` is not an http(s) URL
    /// - `user_agent` is empty
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `max_pages` is 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_region.trim().is_empty() {
            return Err(ConfigError::Invalid { field: "default_region".into(), reason: "must not be empty".into() });
        }

        if self.default_max_results == 0 {
            return Err(ConfigError::Invalid {
                field: "default_max_results".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.default_max_results > MAX_RESULTS_LIMIT {
            return Err(ConfigError::Invalid {
                field: "default_max_results".into(),
                reason: format!("must not exceed {MAX_RESULTS_LIMIT}"),
            });
        }

        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(ConfigError::Invalid { field: "base_url".into(), reason: "must be an http(s) URL".into() });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.max_pages == 0 {
            return Err(ConfigError::Invalid { field: "max_pages".into(), reason: "must be at least 1".into() });
        }

        if self.min_request_interval_ms == 0 {
            tracing::warn!("min_request_interval_ms is 0; provider requests will not be spaced out");
        }

        Ok(())
    }
}
