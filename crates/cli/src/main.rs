//! doniyor command line front end.
//!
//! Runs one private search and prints the results as JSON on stdout.
//! Logging goes to stderr so the output stays machine-readable.

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use doniyor_client::DuckDuckGoProvider;
use doniyor_core::{AppConfig, QueryOverrides, SearchEngine};
use futures_util::StreamExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "doniyor")]
#[command(about = "Privacy-first web search from the terminal")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search the web and print deduplicated results
    Search {
        /// Search phrase
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Region code such as "us-en"
        #[arg(short, long)]
        region: Option<String>,

        /// Maximum results to fetch (values below 1 become 1)
        #[arg(short = 'n', long, allow_negative_numbers = true)]
        max_results: Option<i64>,

        /// Override the safe-search default (true or false)
        #[arg(long)]
        safe_search: Option<bool>,

        /// Print each result as it arrives, one JSON object per line
        #[arg(long)]
        stream: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_status(&e))
        }
    }
}

/// Exit status for a failed run: 2 for a rejected query, 3 for bad
/// configuration, 1 otherwise.
fn exit_status(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<doniyor_core::Error>() {
        Some(e) if e.is_invalid_query() => 2,
        Some(e) if e.is_config() => 3,
        _ => 1,
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load().map_err(doniyor_core::Error::from)?;
    let provider = DuckDuckGoProvider::from_app_config(&config)?;
    let engine = SearchEngine::new(config.engine_config(), provider);

    match cli.command {
        Commands::Search { query, region, max_results, safe_search, stream } => {
            let text = query.join(" ");
            let overrides = QueryOverrides { region, max_results, safe_search };

            if stream {
                let mut results = engine.search_iter(&text, &overrides)?;
                while let Some(result) = results.next().await {
                    println!("{}", serde_json::to_string(&result?)?);
                }
            } else {
                let results = engine.search(&text, &overrides).await?;
                let output = serde_json::json!({
                    "query": text,
                    "count": results.len(),
                    "results": results,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
        }
    }

    Ok(())
}
