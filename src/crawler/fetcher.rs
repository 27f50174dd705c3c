//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the shared HTTP client with a browser-like identity
//! - One bounded-time GET per page
//! - Content-Type screening (only HTML is handed on)
//! - Error classification

use crate::config::UserAgentConfig;
use crate::CrawlError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Maximum redirect hops followed for one request
const MAX_REDIRECTS: usize = 10;

/// Content types treated as HTML pages
const HTML_CONTENT_TYPES: &[&str] = &["text/html", "application/xhtml+xml"];

/// Result of a fetch operation
#[derive(Debug)]
pub enum PageResult {
    /// Successfully fetched an HTML page
    Page {
        /// Final URL after redirects
        final_url: Url,
        /// Page body content
        body: String,
    },

    /// The response was not HTML; nothing to extract or traverse
    Skipped {
        /// The Content-Type received (empty when the header was missing)
        content_type: String,
    },

    /// The page could not be fetched
    Failed(FetchFailure),
}

/// Why a fetch failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// The request did not complete within its timeout
    Timeout,
    /// DNS, TCP, TLS or body transfer failure
    Connection(String),
    /// The server answered with a non-success status
    HttpStatus(u16),
}

impl FetchFailure {
    /// Converts the failure into the row-level error for `url`
    pub fn into_crawl_error(self, url: &Url) -> CrawlError {
        let url = url.to_string();
        match self {
            Self::Timeout => CrawlError::FetchTimeout { url },
            Self::Connection(message) => CrawlError::FetchConnectionError { url, message },
            Self::HttpStatus(status) => CrawlError::FetchHttpError { url, status },
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// Timeouts are not set on the client; every request carries its own.
///
/// # Example
///
/// ```no_run
/// use email_finder::config::UserAgentConfig;
/// use email_finder::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.8,fr;q=0.6,de;q=0.5"),
    );

    Client::builder()
        .user_agent(config.value.as_str())
        .default_headers(headers)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Performs single-page GETs for the crawler
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher with its own client
    pub fn from_config(config: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }

    /// Fetches `url`, giving up after `timeout`
    ///
    /// The timeout covers the whole exchange: connection setup, redirects and
    /// reading the body.
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | 2xx + HTML | `Page` |
    /// | 2xx + other Content-Type | `Skipped` |
    /// | non-2xx status | `Failed(HttpStatus)` |
    /// | timeout | `Failed(Timeout)` |
    /// | connection, TLS, redirect or body error | `Failed(Connection)` |
    pub async fn fetch(&self, url: &Url, timeout: Duration) -> PageResult {
        let response = match self.client.get(url.clone()).timeout(timeout).send().await {
            Ok(response) => response,
            Err(e) => return PageResult::Failed(classify_error(&e)),
        };

        let status = response.status();
        if !status.is_success() {
            return PageResult::Failed(FetchFailure::HttpStatus(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_lowercase();

        if !is_html(&content_type) {
            return PageResult::Skipped { content_type };
        }

        let final_url = response.url().clone();
        match response.text().await {
            Ok(body) => PageResult::Page { final_url, body },
            Err(e) => PageResult::Failed(classify_error(&e)),
        }
    }
}

/// Returns true if the Content-Type header names an HTML document
fn is_html(content_type: &str) -> bool {
    let mime = content_type.split(';').next().unwrap_or("").trim();
    HTML_CONTENT_TYPES.contains(&mime)
}

/// Maps a reqwest error onto a failure kind
fn classify_error(e: &reqwest::Error) -> FetchFailure {
    if e.is_timeout() {
        FetchFailure::Timeout
    } else if e.is_connect() {
        FetchFailure::Connection(format!("connection failed: {}", e))
    } else if e.is_redirect() {
        FetchFailure::Connection(format!("redirect error: {}", e))
    } else {
        FetchFailure::Connection(e.to_string())
    }
}
