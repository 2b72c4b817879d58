//! Query normalization.
//!
//! Turns raw caller text plus optional overrides into an immutable
//! [`SearchQuery`]. Pure: no I/O and no logging, so query text never leaves
//! this module except inside the returned value.

use serde::{Deserialize, Serialize};

use crate::engine::EngineConfig;
use crate::error::Error;

/// Message returned when the query text is empty or whitespace-only.
pub const EMPTY_QUERY_MESSAGE: &str = "Query text must be non-empty";

/// Normalized representation of a user search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    text: String,
    region: String,
    max_results: u32,
    safe_search: bool,
}

impl SearchQuery {
    /// Query text with whitespace runs collapsed to single spaces.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Result cap, always at least 1.
    pub fn max_results(&self) -> u32 {
        self.max_results
    }

    pub fn safe_search(&self) -> bool {
        self.safe_search
    }
}

/// Optional per-request overrides of the engine defaults.
///
/// `None` means "use the default". `max_results` is signed so that callers
/// passing 0 or a negative value get the documented floor of 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOverrides {
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub max_results: Option<i64>,
    #[serde(default)]
    pub safe_search: Option<bool>,
}

impl QueryOverrides {
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn max_results(mut self, max_results: i64) -> Self {
        self.max_results = Some(max_results);
        self
    }

    pub fn safe_search(mut self, safe_search: bool) -> Self {
        self.safe_search = Some(safe_search);
        self
    }
}

/// Collapse every whitespace run into a single ASCII space and trim both ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Clamp a caller-supplied result cap into `1..=u32::MAX`.
pub(crate) fn floor_max_results(value: i64) -> u32 {
    u32::try_from(value.max(1)).unwrap_or(u32::MAX)
}

/// Validate and canonicalize `text` and `overrides` against `config`.
///
/// # Errors
///
/// Returns [`Error::InvalidQuery`] when `text` contains no non-whitespace character.
pub fn build_query(config: &EngineConfig, text: &str, overrides: &QueryOverrides) -> Result<SearchQuery, Error> {
    let normalized = collapse_whitespace(text);
    if normalized.is_empty() {
        return Err(Error::InvalidQuery(EMPTY_QUERY_MESSAGE.into()));
    }

    let region = overrides
        .region
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or(config.default_region())
        .to_string();

    let max_results = overrides
        .max_results
        .map(floor_max_results)
        .unwrap_or(config.default_max_results());

    let safe_search = overrides.safe_search.unwrap_or(config.default_safe_search());

    Ok(SearchQuery { text: normalized, region, max_results, safe_search })
}
