//! web_search tool implementation.
//!
//! Runs a privacy-preserving search through the core engine and returns the
//! deduplicated, cleaned results. Query text is echoed back to the caller but
//! never logged.

use doniyor_core::config::MAX_RESULTS_LIMIT;
use doniyor_core::{QueryOverrides, SearchEngine, SearchProvider, SearchResult};
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::WebError;

/// Input parameters for web_search tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct WebSearchParams {
    /// Search phrase (required).
    pub query: String,

    /// Region code such as "us-en".
    #[serde(default)]
    pub region: Option<String>,

    /// Maximum results to fetch (1-50).
    #[serde(default)]
    pub max_results: Option<i64>,

    /// Filter adult content (defaults to the server setting, normally true).
    #[serde(default)]
    pub safe_search: Option<bool>,
}

/// Output structure for web_search tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WebSearchOutput {
    /// The query as submitted.
    pub query: String,
    /// Number of results returned.
    pub count: usize,
    /// The search results, in provider order.
    pub results: Vec<SearchResult>,
}

/// Implementation of the web_search tool.
pub async fn search_impl<P: SearchProvider>(
    engine: &SearchEngine<P>, params: WebSearchParams,
) -> Result<CallToolResult, McpError> {
    if let Some(max_results) = params.max_results
        && !(1..=i64::from(MAX_RESULTS_LIMIT)).contains(&max_results)
    {
        return Err(WebError::InvalidInput(format!("max_results must be between 1 and {MAX_RESULTS_LIMIT}")).into());
    }

    let overrides =
        QueryOverrides { region: params.region, max_results: params.max_results, safe_search: params.safe_search };

    let results = engine.search(&params.query, &overrides).await.inspect_err(|e| {
        if e.is_provider() {
            tracing::warn!(error = %e, "web_search failed upstream");
        }
    })?;

    tracing::info!(count = results.len(), "web_search completed");

    let output = WebSearchOutput { query: params.query, count: results.len(), results };

    Ok(CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(&output).unwrap_or_default(),
    )]))
}
