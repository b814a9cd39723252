//! HTTP fetcher implementation
//!
//! This module handles all page requests for the crawler, including:
//! - Building HTTP clients with a browser-like user agent string
//! - GET requests to fetch listing pages
//! - Error classification
//!
//! Transport failures never propagate: they are logged with the page URL
//! and reported as a non-success [`FetchResult`] with no body, which the
//! crawl loop treats as a page without records.

use crate::config::CrawlerConfig;
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use reqwest::Client;
use std::time::Duration;

/// First Firefox release the synthetic version counts from
const BASE_BROWSER_VERSION: i64 = 125;

/// Result of a fetch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body, decoded as UTF-8 with replacement
        body: String,
    },

    /// Server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
        /// Canonical reason phrase, if the status has one
        reason: String,
    },

    /// Network error (DNS, connection refused, timeout, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Page body; empty for every failure
    pub fn into_body(self) -> String {
        match self {
            Self::Success { body, .. } => body,
            _ => String::new(),
        }
    }
}

/// Source of listing page markup
///
/// The crawl loop only ever calls `fetch`; swapping the implementation lets
/// tests serve pages from memory.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches one page. Must not fail: errors become non-success results.
    async fn fetch(&self, url: &str) -> FetchResult;
}

/// Builds a Firefox user agent whose version advances with the date
///
/// The version starts at 125 on 2024-04-16 and goes up by one every 30
/// days, so the identity stays plausible without any lookup.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use jobsift::crawler::browser_user_agent;
///
/// let ua = browser_user_agent(NaiveDate::from_ymd_opt(2024, 5, 16).unwrap());
/// assert!(ua.ends_with("Firefox/126.0"));
/// ```
pub fn browser_user_agent(today: NaiveDate) -> String {
    let base_date = NaiveDate::from_ymd_opt(2024, 4, 16).unwrap_or_default();
    let days = (today - base_date).num_days();
    let version = BASE_BROWSER_VERSION + days.div_euclid(30);

    format!(
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:{version}.0) Gecko/20100101 Firefox/{version}.0"
    )
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The crawler configuration (request timeout)
/// * `today` - Date the user agent version is derived from
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &CrawlerConfig, today: NaiveDate) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_secs(config.request_timeout_secs);

    Client::builder()
        .user_agent(browser_user_agent(today))
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and classifies the outcome
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx | Success |
/// | Any other status | HttpError |
/// | Timeout | NetworkError |
/// | Connection refused / DNS | NetworkError |
/// | Body read failure | NetworkError |
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status();
            let final_url = response.url().to_string();

            if !status.is_success() {
                return FetchResult::HttpError {
                    status_code: status.as_u16(),
                    reason: status.canonical_reason().unwrap_or("").to_string(),
                };
            }

            match response.bytes().await {
                Ok(bytes) => FetchResult::Success {
                    final_url,
                    status_code: status.as_u16(),
                    body: String::from_utf8_lossy(&bytes).into_owned(),
                },
                Err(e) => FetchResult::NetworkError {
                    error: e.to_string(),
                },
            }
        }
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                format!("Connection failed: {}", e)
            } else {
                e.to_string()
            };
            FetchResult::NetworkError { error }
        }
    }
}

/// Production fetcher backed by `reqwest`
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher whose user agent reflects today's date
    pub fn new(config: &CrawlerConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(config, Local::now().date_naive())?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        let result = fetch_url(&self.client, url).await;

        match &result {
            FetchResult::Success { status_code, .. } => {
                tracing::debug!("Fetched {} ({})", url, status_code);
            }
            FetchResult::HttpError {
                status_code,
                reason,
            } => {
                tracing::error!("HTTP {} {} for page {}", status_code, reason, url);
            }
            FetchResult::NetworkError { error } => {
                tracing::error!("Failed to fetch page {}: {}", url, error);
            }
        }

        result
    }
}
