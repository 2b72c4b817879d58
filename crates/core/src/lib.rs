//! Core types and search pipeline for doniyor.
//!
//! This crate provides:
//! - Query normalization and result sanitization
//! - The search orchestrator over a pluggable provider
//! - Unified error types
//! - Configuration structures

pub mod config;
pub mod engine;
pub mod error;
pub mod provider;
pub mod query;
pub mod result;

pub use config::{AppConfig, ConfigError};
pub use engine::{EngineConfig, ResultStream, SearchEngine};
pub use error::{Error, ProviderError};
pub use provider::{ProviderSession, RawRecord, RawRecordStream, SafeMode, SearchProvider, TextSearchParams};
pub use query::{QueryOverrides, SearchQuery};
pub use result::SearchResult;
