//! DuckDuckGo client error types.

use std::sync::Arc;

use doniyor_core::ProviderError;

/// Errors from the DuckDuckGo HTML endpoint client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DuckDuckGoError {
    /// The configured base URL does not parse.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client")]
    ClientBuild,

    /// The endpoint served an anomaly/challenge page or throttled us.
    #[error("rate limited: status {status}")]
    RateLimited { status: u16 },

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response body was not a recognizable result page.
    #[error("unrecognized result page")]
    Parse,
}

impl From<reqwest::Error> for DuckDuckGoError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { DuckDuckGoError::Timeout } else { DuckDuckGoError::Network(Arc::new(err)) }
    }
}

impl From<DuckDuckGoError> for ProviderError {
    fn from(err: DuckDuckGoError) -> Self {
        match err {
            DuckDuckGoError::InvalidBaseUrl(_) | DuckDuckGoError::ClientBuild => ProviderError::Session,
            DuckDuckGoError::RateLimited { .. } => ProviderError::RateLimited,
            DuckDuckGoError::HttpError { status } => ProviderError::HttpStatus { status },
            DuckDuckGoError::Timeout => ProviderError::Timeout,
            DuckDuckGoError::Network(_) => ProviderError::Network,
            DuckDuckGoError::Parse => ProviderError::MalformedResponse,
        }
    }
}
