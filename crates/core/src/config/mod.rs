//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (DONIYOR_*)
//! 2. TOML config file (if DONIYOR_CONFIG_FILE set)
//! 3. Built-in defaults

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::engine::EngineConfig;

mod validation;

pub use validation::ConfigError;

/// Upper bound accepted for `default_max_results` and per-request overrides at the boundary.
pub const MAX_RESULTS_LIMIT: u32 = 50;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (DONIYOR_*)
/// 2. TOML config file (if DONIYOR_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Region code used when a request does not name one.
    ///
    /// Set via DONIYOR_DEFAULT_REGION environment variable.
    #[serde(default = "default_region")]
    pub default_region: String,

    /// Result cap used when a request does not name one.
    ///
    /// Set via DONIYOR_DEFAULT_MAX_RESULTS environment variable.
    #[serde(default = "default_max_results")]
    pub default_max_results: u32,

    /// Safe-search setting used when a request does not name one.
    ///
    /// Set via DONIYOR_DEFAULT_SAFE_SEARCH environment variable.
    #[serde(default = "default_true")]
    pub default_safe_search: bool,

    /// Base URL of the DuckDuckGo HTML endpoint.
    ///
    /// Set via DONIYOR_BASE_URL environment variable.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User-Agent string for provider requests.
    ///
    /// Set via DONIYOR_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via DONIYOR_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Minimum spacing between outbound provider requests in milliseconds.
    ///
    /// Set via DONIYOR_MIN_REQUEST_INTERVAL_MS environment variable.
    #[serde(default = "default_min_request_interval_ms")]
    pub min_request_interval_ms: u64,

    /// Maximum number of result pages fetched per search.
    ///
    /// Set via DONIYOR_MAX_PAGES environment variable.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

fn default_region() -> String {
    "us-en".into()
}

fn default_max_results() -> u32 {
    10
}

fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    "https://html.duckduckgo.com".into()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; doniyor/0.1)".into()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_min_request_interval_ms() -> u64 {
    1_000
}

fn default_max_pages() -> u32 {
    5
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_region: default_region(),
            default_max_results: default_max_results(),
            default_safe_search: true,
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            min_request_interval_ms: default_min_request_interval_ms(),
            max_pages: default_max_pages(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Request spacing as Duration for the provider's rate limiter.
    pub fn min_request_interval(&self) -> Duration {
        Duration::from_millis(self.min_request_interval_ms)
    }

    /// Process-wide engine defaults derived from this configuration.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::new(
            self.default_region.clone(),
            i64::from(self.default_max_results),
            self.default_safe_search,
        )
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `DONIYOR_`
    /// 2. TOML file from `DONIYOR_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("DONIYOR_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("DONIYOR_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into()),
        );

        Self::from_figment(figment)
    }

    fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
