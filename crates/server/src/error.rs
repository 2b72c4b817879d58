//! Structured errors for the doniyor MCP server.
//!
//! Boundary-level checks that the core engine does not perform.

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Structured errors for the doniyor MCP server.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    /// Invalid input parameters (e.g., max_results out of range).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),
}

impl From<WebError> for McpError {
    fn from(err: WebError) -> Self {
        let (code, message) = match &err {
            WebError::InvalidInput(msg) => (-32602, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
