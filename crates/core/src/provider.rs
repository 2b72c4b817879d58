//! Boundary to the external search provider.
//!
//! A provider hands out scoped sessions; a session issues one text search and
//! returns a lazy stream of raw records. Sessions release their resources in
//! `Drop`, so every exit path (completion, error, early drop) cleans up.

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::query::SearchQuery;

/// An unstructured result item as returned by the provider before cleaning.
pub type RawRecord = serde_json::Value;

/// Lazy, single-pass stream of raw records borrowed from a session.
pub type RawRecordStream<'a> = BoxStream<'a, Result<RawRecord, ProviderError>>;

/// Provider-side content filtering level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SafeMode {
    Off,
    Moderate,
    Strict,
}

impl SafeMode {
    /// Map the boolean safe-search flag onto the provider vocabulary.
    ///
    /// Only `Off` and `Moderate` are produced. `Strict` has no boolean
    /// spelling and is unreachable from caller input.
    pub fn from_safe_search(safe_search: bool) -> Self {
        match safe_search {
            true => SafeMode::Moderate,
            false => SafeMode::Off,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SafeMode::Off => "off",
            SafeMode::Moderate => "moderate",
            SafeMode::Strict => "strict",
        }
    }
}

/// Parameters of one text search call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSearchParams {
    pub query_text: String,
    pub region: String,
    pub safe_mode: SafeMode,
    pub max_results: u32,
}

impl From<&SearchQuery> for TextSearchParams {
    fn from(query: &SearchQuery) -> Self {
        Self {
            query_text: query.text().to_string(),
            region: query.region().to_string(),
            safe_mode: SafeMode::from_safe_search(query.safe_search()),
            max_results: query.max_results(),
        }
    }
}

/// An open provider session.
pub trait ProviderSession: Send {
    /// Issue one text search. Records are fetched as the stream is polled.
    fn text_search(&mut self, params: TextSearchParams) -> RawRecordStream<'_>;
}

/// A search backend that can open scoped sessions.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Acquire a session; it is released when the returned box is dropped.
    async fn open_session(&self) -> Result<Box<dyn ProviderSession>, ProviderError>;
}
