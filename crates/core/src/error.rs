//! Unified error types for doniyor.
//!
//! Every message here is safe to show to a caller or write to a log: none of
//! them embed query text or upstream response bodies.

use rmcp::model::{ErrorCode, ErrorData as McpError};

use crate::config::ConfigError;

/// Generic message surfaced to callers when the upstream provider fails.
pub const PROVIDER_FAILURE_MESSAGE: &str = "Failed to fetch privacy-preserving results";

/// Failures raised while opening a provider session or consuming its record stream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// The session could not be established (client construction failed).
    #[error("provider session could not be opened")]
    Session,

    /// The provider did not answer in time.
    #[error("provider request timed out")]
    Timeout,

    /// Transport-level failure (DNS, TLS, connection reset).
    #[error("provider network failure")]
    Network,

    /// The provider throttled or challenged the request.
    #[error("provider rate limited the request")]
    RateLimited,

    /// Unexpected HTTP status.
    #[error("provider returned HTTP {status}")]
    HttpStatus { status: u16 },

    /// The response body could not be interpreted.
    #[error("provider response could not be parsed")]
    MalformedResponse,
}

/// Unified error type for the search pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Caller input was rejected before any network call.
    #[error("INVALID_QUERY: {0}")]
    InvalidQuery(String),

    /// The upstream provider failed.
    #[error("PROVIDER_ERROR: {0}")]
    Provider(#[from] ProviderError),

    /// Configuration could not be loaded or failed validation.
    #[error("CONFIG_ERROR: {0}")]
    Config(#[from] ConfigError),
}

impl Error {
    /// Whether the error was caused by the caller (client-error class).
    pub fn is_invalid_query(&self) -> bool {
        matches!(self, Error::InvalidQuery(_))
    }

    /// Whether the error came from upstream (gateway-error class).
    pub fn is_provider(&self) -> bool {
        matches!(self, Error::Provider(_))
    }

    /// Whether the error came from loading or validating configuration.
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidQuery(msg) => (-32602, msg.clone()),
            Error::Provider(_) => (-32010, PROVIDER_FAILURE_MESSAGE.to_string()),
            Error::Config(e) => (-32603, e.to_string()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
