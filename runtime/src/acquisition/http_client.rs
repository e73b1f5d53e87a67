//! Async HTTP client wrapping reqwest.
//!
//! Not a browser — one GET per call. Follows redirects, bounds each request
//! by a timeout, and never retries.

use crate::config::HarvestConfig;
use crate::error::FetchError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Body of one successful GET.
#[derive(Debug, Clone)]
pub struct RawResource {
    /// Requested URL.
    pub url: String,
    /// Final URL after redirects.
    pub final_url: String,
    /// HTTP status code.
    pub status: u16,
    /// Response body decoded as text.
    pub content: String,
    /// Length of `content` in characters.
    pub size: usize,
}

impl RawResource {
    pub fn new(url: impl Into<String>, status: u16, content: String) -> Self {
        let url = url.into();
        let size = content.chars().count();
        Self {
            final_url: url.clone(),
            url,
            status,
            content,
            size,
        }
    }
}

/// Anything that can turn a URL into text.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// GET `url`; any transport failure or non-success status is an error.
    async fn fetch(&self, url: &str) -> Result<RawResource, FetchError>;
}

/// reqwest-backed [`Fetcher`] shared by every request of the process.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpClient {
    /// Create a client sending `user_agent` on every request.
    ///
    /// Fails if `user_agent` is not a valid header value.
    pub fn new(timeout_ms: u64, user_agent: &str) -> Result<Self> {
        let timeout = Duration::from_millis(timeout_ms);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .with_context(|| {
                format!("failed to build HTTP client for user agent {user_agent:?}")
            })?;

        Ok(Self { client, timeout })
    }

    pub fn from_config(config: &HarvestConfig) -> Result<Self> {
        Self::new(config.fetch_timeout_ms, &config.user_agent)
    }
}

#[async_trait]
impl Fetcher for HttpClient {
    async fn fetch(&self, url: &str) -> Result<RawResource, FetchError> {
        let resp = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = resp.status();
        // Redirects are followed by reqwest, so a 3xx here is terminal but not an error.
        if !(status.is_success() || status.is_redirection()) {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = resp.url().to_string();
        let content = resp
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let mut raw = RawResource::new(url, status.as_u16(), content);
        raw.final_url = final_url;
        Ok(raw)
    }
}
