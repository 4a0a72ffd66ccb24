//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building HTTP clients with a descriptive user agent and a fixed timeout
//! - GET requests to fetch page content
//! - Error classification into a typed, non-fatal [`FetchFailure`]

use crate::config::UserAgentConfig;
use reqwest::{redirect::Policy, Client};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Default per-page request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum redirect hops followed for one page
const MAX_REDIRECTS: usize = 10;

/// Why a page could not be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchCause {
    /// The request exceeded the per-page timeout
    Timeout,
    /// Connection refused, DNS failure, TLS error
    Connect,
    /// Non-2xx response
    Status(u16),
    /// Content-Type present and not HTML
    NotHtml(String),
    /// The response body could not be read
    Body(String),
    /// Any other request error
    Request(String),
}

impl fmt::Display for FetchCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "request timeout"),
            Self::Connect => write!(f, "connection failed"),
            Self::Status(code) => write!(f, "HTTP {}", code),
            Self::NotHtml(content_type) => write!(f, "expected HTML, got {}", content_type),
            Self::Body(msg) => write!(f, "failed to read body: {}", msg),
            Self::Request(msg) => write!(f, "{}", msg),
        }
    }
}

/// A page that could not be fetched
///
/// Recoverable: the crawler logs it, counts it against the page budget and
/// moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to fetch {url}: {cause}")]
pub struct FetchFailure {
    pub url: String,
    pub cause: FetchCause,
}

impl FetchFailure {
    pub fn new(url: impl Into<String>, cause: FetchCause) -> Self {
        Self {
            url: url.into(),
            cause,
        }
    }

    fn from_reqwest(url: &str, error: &reqwest::Error) -> Self {
        let cause = if error.is_timeout() {
            FetchCause::Timeout
        } else if error.is_connect() {
            FetchCause::Connect
        } else if let Some(status) = error.status() {
            FetchCause::Status(status.as_u16())
        } else {
            FetchCause::Request(error.to_string())
        };
        Self::new(url, cause)
    }
}

/// Raw content of a fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,

    /// Page body content
    pub body: String,
}

/// Retrieves raw page content over HTTP
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    /// Creates a fetcher with the given identity and per-page timeout
    pub fn new(user_agent: &UserAgentConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(user_agent, timeout)?,
        })
    }

    /// Wraps an already configured client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Fetches a URL
    ///
    /// # Failure Classification
    ///
    /// | Condition | Cause |
    /// |-----------|-------|
    /// | Timeout | `Timeout` |
    /// | Connection refused / TLS | `Connect` |
    /// | Non-2xx status | `Status(code)` |
    /// | Content-Type not HTML | `NotHtml` |
    /// | Body read error | `Body` |
    ///
    /// Never retries; the caller decides what a failure means.
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchFailure> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchFailure::from_reqwest(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure::new(url, FetchCause::Status(status.as_u16())));
        }

        let final_url = response.url().to_string();

        if let Some(content_type) = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !content_type.to_ascii_lowercase().contains("html") {
                return Err(FetchFailure::new(
                    url,
                    FetchCause::NotHtml(content_type.to_string()),
                ));
            }
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchFailure::new(url, FetchCause::Timeout)
            } else {
                FetchFailure::new(url, FetchCause::Body(e.to_string()))
            }
        })?;

        Ok(FetchedPage { final_url, body })
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use docs_scout::config::UserAgentConfig;
/// use docs_scout::crawler::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig {
///     crawler_name: "DocsScout".to_string(),
///     crawler_version: "0.1".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(timeout)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}
