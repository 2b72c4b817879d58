//! doniyor MCP server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use doniyor_client::DuckDuckGoProvider;
use doniyor_core::{AppConfig, SearchEngine};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod error;
mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load().map_err(doniyor_core::Error::from)?;
    let provider = DuckDuckGoProvider::from_app_config(&config)?;
    let engine = Arc::new(SearchEngine::new(config.engine_config(), provider));

    tracing::info!(
        default_region = %config.default_region,
        default_max_results = config.default_max_results,
        "Starting doniyor server on stdio transport"
    );

    let handler = handler::DoniyorServer::new(engine);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
