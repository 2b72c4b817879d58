//! DuckDuckGo HTML endpoint provider.
//!
//! Implements the core provider traits on top of the JavaScript-free HTML
//! endpoint.
//!
//! ### Protocol
//!
//! - **Endpoint**: `POST {base_url}/html/` with a form body (`q`, `kl`, `kp`, `b`).
//! - **Pagination**: follows the hidden fields of the page's "Next" form until
//!   `max_results` records were produced or `max_pages` pages were fetched.
//! - **Rate Limiting**: minimum interval between requests, shared by every
//!   session of one provider. 202/403/429 answers are treated as throttling.
//! - **Sessions**: each session owns its own HTTP client (connection pool and
//!   cookies). Dropping the session releases it.
//!
//! Query text is sent in the request body only and is never logged.

pub mod error;
pub mod request;
pub mod response;

pub use error::DuckDuckGoError;
pub use request::{PageForm, SearchForm, safe_mode_param};
pub use response::{ResultPage, parse_page, unwrap_redirect};

use async_stream::try_stream;
use async_trait::async_trait;
use doniyor_core::{
    AppConfig, ProviderError, ProviderSession, RawRecord, RawRecordStream, SearchProvider, TextSearchParams,
};
use futures_util::Stream;
use reqwest::{StatusCode, header};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Default base URL of the HTML endpoint.
const DEFAULT_BASE_URL: &str = "https://html.duckduckgo.com";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; doniyor/0.1)";

/// Default minimum interval between requests.
const DEFAULT_MIN_REQUEST_INTERVAL: Duration = Duration::from_secs(1);

/// Default cap on result pages fetched per search.
const DEFAULT_MAX_PAGES: u32 = 5;

/// DuckDuckGo provider configuration.
#[derive(Debug, Clone)]
pub struct DuckDuckGoConfig {
    /// Base URL (default: https://html.duckduckgo.com).
    pub base_url: String,
    /// Request timeout (default: 10s).
    pub timeout: Duration,
    /// User-agent string.
    pub user_agent: String,
    /// Minimum spacing between requests (default: 1s).
    pub min_request_interval: Duration,
    /// Maximum pages fetched per search (default: 5).
    pub max_pages: u32,
}

impl Default for DuckDuckGoConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            min_request_interval: DEFAULT_MIN_REQUEST_INTERVAL,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

impl From<&AppConfig> for DuckDuckGoConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
            min_request_interval: config.min_request_interval(),
            max_pages: config.max_pages,
        }
    }
}

/// Rate limiter to enforce request intervals.
#[derive(Debug)]
struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self { last_request: Mutex::new(None), min_interval }
    }

    /// Acquire permission to make a request, waiting if necessary.
    async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// DuckDuckGo search provider.
#[derive(Debug, Clone)]
pub struct DuckDuckGoProvider {
    config: Arc<DuckDuckGoConfig>,
    rate_limiter: Arc<RateLimiter>,
}

impl DuckDuckGoProvider {
    /// Create a new provider with the given configuration.
    pub fn new(config: DuckDuckGoConfig) -> Result<Self, DuckDuckGoError> {
        url::Url::parse(&config.base_url).map_err(|_| DuckDuckGoError::InvalidBaseUrl(config.base_url.clone()))?;

        let rate_limiter = Arc::new(RateLimiter::new(config.min_request_interval));
        Ok(Self { config: Arc::new(config), rate_limiter })
    }

    /// Create a new provider from the application configuration.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, DuckDuckGoError> {
        Self::new(DuckDuckGoConfig::from(config))
    }

    pub fn config(&self) -> &DuckDuckGoConfig {
        &self.config
    }

    fn build_http(&self) -> Result<reqwest::Client, DuckDuckGoError> {
        reqwest::Client::builder()
            .user_agent(&self.config.user_agent)
            .timeout(self.config.timeout)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|_| DuckDuckGoError::ClientBuild)
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoProvider {
    async fn open_session(&self) -> Result<Box<dyn ProviderSession>, ProviderError> {
        let http = self.build_http()?;
        tracing::debug!("duckduckgo session opened");

        Ok(Box::new(DuckDuckGoSession {
            http,
            config: self.config.clone(),
            rate_limiter: self.rate_limiter.clone(),
        }))
    }
}

/// One scoped DuckDuckGo session.
pub struct DuckDuckGoSession {
    http: reqwest::Client,
    config: Arc<DuckDuckGoConfig>,
    rate_limiter: Arc<RateLimiter>,
}

impl DuckDuckGoSession {
    /// Fetch and parse one result page.
    async fn fetch_page(&self, form: &PageForm) -> Result<ResultPage, DuckDuckGoError> {
        self.rate_limiter.acquire().await;

        let start = Instant::now();
        let url = format!("{}/html/", self.config.base_url.trim_end_matches('/'));

        let http_response = self
            .http
            .post(&url)
            .header(header::ACCEPT, "text/html,application/xhtml+xml")
            .form(&form.fields())
            .send()
            .await?;

        let status = http_response.status();
        tracing::debug!(status = status.as_u16(), "duckduckgo response status");

        if matches!(status, StatusCode::ACCEPTED | StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS) {
            return Err(DuckDuckGoError::RateLimited { status: status.as_u16() });
        }

        if !status.is_success() {
            return Err(DuckDuckGoError::HttpError { status: status.as_u16() });
        }

        let body = http_response.text().await?;
        let page = parse_page(&body).ok_or(DuckDuckGoError::Parse)?;

        tracing::debug!(
            records = page.records.len(),
            has_next = page.next_page.is_some(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "duckduckgo page parsed"
        );

        Ok(page)
    }

    fn pages(&self, params: TextSearchParams) -> impl Stream<Item = Result<RawRecord, ProviderError>> + Send + '_ {
        try_stream! {
            let mut form = PageForm::First(SearchForm::from(&params));
            let mut yielded = 0u32;

            for _ in 0..self.config.max_pages {
                let page = self.fetch_page(&form).await.inspect_err(|e| {
                    tracing::debug!(error = %e, "duckduckgo page fetch failed");
                })?;

                if page.is_empty() {
                    break;
                }

                for record in page.records {
                    if yielded >= params.max_results {
                        break;
                    }
                    yielded += 1;
                    yield record;
                }

                if yielded >= params.max_results {
                    break;
                }

                match page.next_page {
                    Some(fields) => form = PageForm::Next(fields),
                    None => break,
                }
            }
        }
    }
}

impl ProviderSession for DuckDuckGoSession {
    fn text_search(&mut self, params: TextSearchParams) -> RawRecordStream<'_> {
        Box::pin(self.pages(params))
    }
}

impl Drop for DuckDuckGoSession {
    fn drop(&mut self) {
        tracing::debug!("duckduckgo session released");
    }
}
