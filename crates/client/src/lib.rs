//! Search provider clients for doniyor.
//!
//! This crate provides the DuckDuckGo HTML endpoint provider that plugs into
//! the core search engine, plus helpers for parsing its result pages.

pub mod duckduckgo;

pub use duckduckgo::{DuckDuckGoConfig, DuckDuckGoError, DuckDuckGoProvider, DuckDuckGoSession};
