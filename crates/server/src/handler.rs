//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::tools::web_search::{WebSearchParams, search_impl};

use doniyor_client::DuckDuckGoProvider;
use doniyor_core::SearchEngine;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for doniyor.
#[derive(Clone)]
pub struct DoniyorServer {
    tool_router: ToolRouter<Self>,
    engine: Arc<SearchEngine<DuckDuckGoProvider>>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl DoniyorServer {
    /// Create a new server handler around a shared engine.
    pub fn new(engine: Arc<SearchEngine<DuckDuckGoProvider>>) -> Self {
        Self { tool_router: Self::tool_router(), engine }
    }

    /// Search the web privately.
    ///
    /// Results are deduplicated by URL and cleaned of markup entities and
    /// stray whitespace. Nothing about the query is stored or logged.
    #[tool(
        description = "Privacy-first web search. Returns deduplicated results with title, url, and snippet. No query data is stored or logged."
    )]
    async fn web_search(&self, params: Parameters<WebSearchParams>) -> Result<CallToolResult, McpError> {
        search_impl(self.engine.as_ref(), params.0).await
    }
}

impl ServerHandler for DoniyorServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "doniyor".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Doniyor is a privacy-first search facade. Use web_search for web results; \
                 no personal data is stored or logged."
                    .into(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
