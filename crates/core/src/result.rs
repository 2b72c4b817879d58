//! Result sanitization.
//!
//! Converts one loosely-typed provider record into a clean [`SearchResult`].
//! Missing, null or non-string fields degrade to empty strings; this never fails.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::query::collapse_whitespace;

/// A single search result item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchResult {
    /// Result title.
    pub title: String,
    /// Result URL.
    pub url: String,
    /// Result snippet with whitespace collapsed.
    pub snippet: String,
}

impl SearchResult {
    /// Build a result from a raw provider record.
    ///
    /// Reads `title`, `href` (falling back to `url`) and `body` (falling back
    /// to `snippet`). The URL may come out empty; callers filter those.
    pub fn from_raw(record: &Map<String, Value>) -> Self {
        let title = decode_entities(field(record, &["title"]));
        let url = field(record, &["href", "url"]).trim().to_string();
        let body = decode_entities(field(record, &["body", "snippet"]));

        Self { title: title.trim().to_string(), url, snippet: collapse_whitespace(&body) }
    }
}

/// First non-empty string value among `keys`, or `""`.
fn field<'a>(record: &'a Map<String, Value>, keys: &[&str]) -> &'a str {
    keys.iter()
        .filter_map(|key| record.get(*key).and_then(Value::as_str))
        .find(|value| !value.is_empty())
        .unwrap_or("")
}

/// Decode HTML character references (`&amp;`, `&#39;`, `&eacute;` ...).
///
/// Everything that is not a character reference is left untouched, including
/// markup-looking text, line endings and control characters.
pub fn decode_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}
