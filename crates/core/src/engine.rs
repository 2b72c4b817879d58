//! Search orchestration.
//!
//! [`SearchEngine`] owns the process-wide defaults and a provider. One search
//! call runs: normalize → open session → stream raw records → sanitize →
//! drop empty and repeated URLs → emit in provider order.
//!
//! The lazy form ([`SearchEngine::search_iter`]) is the only pipeline; the
//! eager form ([`SearchEngine::search`]) collects it and is all-or-nothing.
//!
//! Nothing here logs query text or result content. Only counts and timings.

use std::collections::HashSet;
use std::time::Instant;

use async_stream::try_stream;
use futures_util::stream::{BoxStream, Stream, StreamExt, TryStreamExt};

use crate::error::Error;
use crate::provider::{SearchProvider, TextSearchParams};
use crate::query::{QueryOverrides, SearchQuery, build_query, floor_max_results};
use crate::result::SearchResult;

/// Lazy, single-pass stream of sanitized results backed by one provider session.
pub type ResultStream<'a> = BoxStream<'a, Result<SearchResult, Error>>;

/// Process-wide search defaults. Read-only once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    default_region: String,
    default_max_results: u32,
    default_safe_search: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { default_region: "us-en".into(), default_max_results: 10, default_safe_search: true }
    }
}

impl EngineConfig {
    /// Create engine defaults. `default_max_results` below 1 is floored to 1.
    pub fn new(default_region: impl Into<String>, default_max_results: i64, default_safe_search: bool) -> Self {
        Self {
            default_region: default_region.into(),
            default_max_results: floor_max_results(default_max_results),
            default_safe_search,
        }
    }

    pub fn default_region(&self) -> &str {
        &self.default_region
    }

    pub fn default_max_results(&self) -> u32 {
        self.default_max_results
    }

    pub fn default_safe_search(&self) -> bool {
        self.default_safe_search
    }
}

/// A privacy-first wrapper around an external search provider.
#[derive(Debug)]
pub struct SearchEngine<P> {
    config: EngineConfig,
    provider: P,
}

impl<P: SearchProvider> SearchEngine<P> {
    pub fn new(config: EngineConfig, provider: P) -> Self {
        Self { config, provider }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Normalize `text` and `overrides` against this engine's defaults.
    pub fn build_query(&self, text: &str, overrides: &QueryOverrides) -> Result<SearchQuery, Error> {
        build_query(&self.config, text, overrides)
    }

    /// Run a search and collect every result.
    ///
    /// Either all deduplicated results are returned or the first error is;
    /// results produced before a provider failure are discarded.
    pub async fn search(&self, text: &str, overrides: &QueryOverrides) -> Result<Vec<SearchResult>, Error> {
        self.search_iter(text, overrides)?.try_collect().await
    }

    /// Run a search lazily.
    ///
    /// Validation happens here, before any stream (and any network call)
    /// exists. The provider session is opened on first poll and released when
    /// the stream finishes or is dropped. A provider failure is yielded as one
    /// `Err` item after the results already produced, then the stream ends.
    pub fn search_iter(&self, text: &str, overrides: &QueryOverrides) -> Result<ResultStream<'_>, Error> {
        let query = self.build_query(text, overrides)?;
        Ok(Box::pin(self.execute(TextSearchParams::from(&query))))
    }

    fn execute(&self, params: TextSearchParams) -> impl Stream<Item = Result<SearchResult, Error>> + Send + '_ {
        try_stream! {
            let start = Instant::now();
            let mut session = self.provider.open_session().await.inspect_err(|e| {
                tracing::warn!(error = %e, "failed to open provider session");
            })?;

            tracing::debug!(
                region = %params.region,
                safe_mode = params.safe_mode.as_str(),
                max_results = params.max_results,
                "provider session opened"
            );

            let mut records = session.text_search(params);
            let mut seen: HashSet<String> = HashSet::new();
            let mut skipped = 0usize;

            while let Some(record) = records.next().await {
                let record = record.inspect_err(|e| {
                    tracing::warn!(error = %e, emitted = seen.len(), "provider stream failed");
                })?;

                let Some(fields) = record.as_object() else {
                    skipped += 1;
                    continue;
                };

                let result = SearchResult::from_raw(fields);
                if result.url.is_empty() || seen.contains(&result.url) {
                    skipped += 1;
                    continue;
                }

                seen.insert(result.url.clone());
                yield result;
            }

            tracing::debug!(
                emitted = seen.len(),
                skipped,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "search completed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::provider::{ProviderSession, RawRecord, RawRecordStream, SafeMode};
    use async_trait::async_trait;
    use futures_util::stream;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Provider that replays a fixed script and counts session lifecycles.
    #[derive(Default)]
    struct ScriptedProvider {
        script: Vec<Result<RawRecord, ProviderError>>,
        fail_open: bool,
        opened: Arc<AtomicUsize>,
        released: Arc<AtomicUsize>,
        params: Arc<Mutex<Vec<TextSearchParams>>>,
    }

    impl ScriptedProvider {
        fn new(script: Vec<Result<RawRecord, ProviderError>>) -> Self {
            Self { script, ..Default::default() }
        }

        fn records(records: Vec<RawRecord>) -> Self {
            Self::new(records.into_iter().map(Ok).collect())
        }

        fn opened(&self) -> usize {
            self.opened.load(Ordering::SeqCst)
        }

        fn released(&self) -> usize {
            self.released.load(Ordering::SeqCst)
        }

        fn last_params(&self) -> Option<TextSearchParams> {
            self.params.lock().unwrap().last().cloned()
        }
    }

    struct ScriptedSession {
        script: Vec<Result<RawRecord, ProviderError>>,
        released: Arc<AtomicUsize>,
        params: Arc<Mutex<Vec<TextSearchParams>>>,
    }

    impl ProviderSession for ScriptedSession {
        fn text_search(&mut self, params: TextSearchParams) -> RawRecordStream<'_> {
            self.params.lock().unwrap().push(params);
            stream::iter(self.script.clone()).boxed()
        }
    }

    impl Drop for ScriptedSession {
        fn drop(&mut self) {
            self.released.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl SearchProvider for ScriptedProvider {
        async fn open_session(&self) -> Result<Box<dyn ProviderSession>, ProviderError> {
            if self.fail_open {
                return Err(ProviderError::Session);
            }
            self.opened.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(ScriptedSession {
                script: self.script.clone(),
                released: self.released.clone(),
                params: self.params.clone(),
            }))
        }
    }

    fn engine(provider: ScriptedProvider) -> SearchEngine<ScriptedProvider> {
        SearchEngine::new(EngineConfig::default(), provider)
    }

    fn duplicate_fixture() -> Vec<RawRecord> {
        vec![
            json!({"title": "Result 1", "href": "https://example.com/a", "body": " A summary "}),
            json!({"title": "Result 2", "href": "https://example.com/a", "body": "Duplicate URL"}),
            json!({"title": "Result 3", "href": "https://example.com/b", "body": "More info"}),
        ]
    }

    #[test]
    fn test_engine_config_floors_max_results() {
        assert_eq!(EngineConfig::new("us-en", 0, true).default_max_results(), 1);
        assert_eq!(EngineConfig::new("us-en", -9, true).default_max_results(), 1);
        assert_eq!(EngineConfig::new("us-en", 12, true).default_max_results(), 12);
    }

    #[test]
    fn test_engine_config_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.default_region(), "us-en");
        assert_eq!(config.default_max_results(), 10);
        assert!(config.default_safe_search());
    }

    #[tokio::test]
    async fn test_search_filters_duplicates() {
        let engine = engine(ScriptedProvider::records(duplicate_fixture()));

        let results = engine.search("privacy", &QueryOverrides::default()).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].url, "https://example.com/a");
        assert_eq!(results[0].title, "Result 1");
        assert_eq!(results[0].snippet, "A summary");
        assert_eq!(results[1].url, "https://example.com/b");
    }

    #[tokio::test]
    async fn test_search_skips_missing_and_empty_urls() {
        let engine = engine(ScriptedProvider::records(vec![
            json!({"title": "no link", "body": "x"}),
            json!({"title": "empty link", "href": "", "body": "x"}),
            json!({"title": "blank link", "href": "   ", "body": "x"}),
            json!({"title": "ok", "href": "https://ok"}),
        ]));

        let results = engine.search("q", &QueryOverrides::default()).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].url, "https://ok");
    }

    #[tokio::test]
    async fn test_search_skips_non_object_records() {
        let engine = engine(ScriptedProvider::records(vec![
            json!("just a string"),
            json!(["https://array"]),
            json!(null),
            json!(17),
            json!({"href": "https://kept"}),
        ]));

        let results = engine.search("q", &QueryOverrides::default()).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].url, "https://kept");
    }

    #[tokio::test]
    async fn test_search_sanitizes_records() {
        let engine = engine(ScriptedProvider::records(vec![json!({
            "title": "A &amp; B",
            "href": "https://x",
            "body": "  hi   there  "
        })]));

        let results = engine.search("q", &QueryOverrides::default()).await.unwrap();
        assert_eq!(
            results,
            vec![SearchResult { title: "A & B".into(), url: "https://x".into(), snippet: "hi there".into() }]
        );
    }

    #[tokio::test]
    async fn test_search_sends_normalized_params() {
        let provider = ScriptedProvider::records(vec![]);
        let params = provider.params.clone();
        let engine = engine(provider);

        let overrides = QueryOverrides::default().region("de-de").max_results(0);
        engine.search("  rust \n async ", &overrides).await.unwrap();

        let sent = params.lock().unwrap().last().cloned().unwrap();
        assert_eq!(sent.query_text, "rust async");
        assert_eq!(sent.region, "de-de");
        assert_eq!(sent.max_results, 1);
        assert_eq!(sent.safe_mode, SafeMode::Moderate);
    }

    #[tokio::test]
    async fn test_search_safe_mode_mapping() {
        let engine = engine(ScriptedProvider::records(vec![]));

        engine.search("q", &QueryOverrides::default().safe_search(true)).await.unwrap();
        assert_eq!(engine.provider().last_params().unwrap().safe_mode, SafeMode::Moderate);

        engine.search("q", &QueryOverrides::default().safe_search(false)).await.unwrap();
        assert_eq!(engine.provider().last_params().unwrap().safe_mode, SafeMode::Off);
    }

    #[tokio::test]
    async fn test_invalid_query_never_opens_session() {
        let engine = engine(ScriptedProvider::records(duplicate_fixture()));

        let result = engine.search("   \t ", &QueryOverrides::default()).await;
        assert!(matches!(result, Err(Error::InvalidQuery(_))));

        assert!(matches!(engine.search_iter("", &QueryOverrides::default()), Err(Error::InvalidQuery(_))));
        assert_eq!(engine.provider().opened(), 0);
    }

    fn failing_after_two() -> ScriptedProvider {
        ScriptedProvider::new(vec![
            Ok(json!({"href": "https://one"})),
            Ok(json!({"href": "https://two"})),
            Err(ProviderError::Network),
            Ok(json!({"href": "https://never"})),
        ])
    }

    #[tokio::test]
    async fn test_eager_search_is_all_or_nothing() {
        let engine = engine(failing_after_two());

        let result = engine.search("q", &QueryOverrides::default()).await;
        assert!(matches!(result, Err(Error::Provider(ProviderError::Network))));
        assert_eq!(engine.provider().released(), 1);
    }

    #[tokio::test]
    async fn test_lazy_search_yields_then_fails() {
        let engine = engine(failing_after_two());

        let mut stream = engine.search_iter("q", &QueryOverrides::default()).unwrap();
        assert_eq!(stream.next().await.unwrap().unwrap().url, "https://one");
        assert_eq!(stream.next().await.unwrap().unwrap().url, "https://two");
        assert!(matches!(stream.next().await, Some(Err(Error::Provider(ProviderError::Network)))));
        assert!(stream.next().await.is_none());
        drop(stream);

        assert_eq!(engine.provider().opened(), 1);
        assert_eq!(engine.provider().released(), 1);
    }

    #[tokio::test]
    async fn test_session_released_after_completion() {
        let engine = engine(ScriptedProvider::records(duplicate_fixture()));

        engine.search("q", &QueryOverrides::default()).await.unwrap();
        engine.search("q", &QueryOverrides::default()).await.unwrap();

        assert_eq!(engine.provider().opened(), 2);
        assert_eq!(engine.provider().released(), 2);
    }

    #[tokio::test]
    async fn test_session_released_on_early_drop() {
        let engine = engine(ScriptedProvider::records(duplicate_fixture()));

        let mut stream = engine.search_iter("q", &QueryOverrides::default()).unwrap();
        assert!(stream.next().await.unwrap().is_ok());
        assert_eq!(engine.provider().released(), 0);

        drop(stream);
        assert_eq!(engine.provider().released(), 1);
    }

    #[tokio::test]
    async fn test_lazy_stream_opens_session_on_first_poll() {
        let engine = engine(ScriptedProvider::records(duplicate_fixture()));

        let stream = engine.search_iter("q", &QueryOverrides::default()).unwrap();
        assert_eq!(engine.provider().opened(), 0);
        drop(stream);
        assert_eq!(engine.provider().opened(), 0);
    }

    #[tokio::test]
    async fn test_open_session_failure_is_provider_error() {
        let provider = ScriptedProvider { fail_open: true, ..Default::default() };
        let engine = engine(provider);

        let result = engine.search("q", &QueryOverrides::default()).await;
        assert!(matches!(result, Err(Error::Provider(ProviderError::Session))));
    }

    #[tokio::test]
    async fn test_dedup_is_scoped_to_one_call() {
        let engine = engine(ScriptedProvider::records(duplicate_fixture()));

        let first = engine.search("q", &QueryOverrides::default()).await.unwrap();
        let second = engine.search("q", &QueryOverrides::default()).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_concurrent_searches_share_engine() {
        let engine = Arc::new(engine(ScriptedProvider::records(duplicate_fixture())));

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let engine = engine.clone();
                tokio::spawn(async move { engine.search(&format!("query {i}"), &QueryOverrides::default()).await })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap().len(), 2);
        }
        assert_eq!(engine.provider().opened(), 4);
        assert_eq!(engine.provider().released(), 4);
    }
}
