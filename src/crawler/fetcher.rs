//! Retrying HTTP fetcher
//!
//! Every request the crawler makes goes through [`Fetcher`], which applies
//! the shared rate limiter, the per-request timeout, the User-Agent header
//! and the retry policy:
//!
//! | Outcome | Action |
//! |---------|--------|
//! | Transport error or timeout | Retry after 100ms |
//! | HTTP 429 | Retry after 100ms |
//! | HTTP 5xx | Retry after 100ms |
//! | Any other status | Return immediately |
//! | Cancellation | Return immediately |
//!
//! When attempts run out the last outcome is returned as is.

use crate::crawler::client::{HttpClient, HttpRequest, HttpResponse};
use crate::crawler::limiter::RateLimiter;
use crate::FetchError;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use std::sync::Arc;
use std::time::Duration;
use tokio::time;
use tokio_util::sync::CancellationToken;

/// Fixed delay before each retry
pub const RETRY_BACKOFF: Duration = Duration::from_millis(100);

/// Retry ceiling for link health probes, independent of the page retry setting
pub const LINK_CHECK_RETRIES: u32 = 2;

/// A fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub status_code: u16,
    /// Present only for 2xx HTML or XML responses
    pub body: Option<String>,
}

/// Status and size of a fetched asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasuredAsset {
    pub status_code: u16,
    /// Content-Length when declared, otherwise the body length. Zero for
    /// error statuses, whose body is never read.
    pub size_bytes: u64,
}

/// How much of a response body an exchange reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyMode {
    /// Never read the body
    Skip,
    /// Read the body of 2xx HTML or XML responses
    Markup,
    /// Read the body only when its size is not declared and status < 400
    Measure,
}

/// The result of a single HTTP exchange
#[derive(Debug)]
struct Exchange {
    status_code: u16,
    content_length: Option<u64>,
    body: Option<Vec<u8>>,
}

/// Rate-limited, retrying HTTP fetcher shared by the whole crawl
pub struct Fetcher {
    client: Arc<dyn HttpClient>,
    user_agent: Option<String>,
    timeout: Duration,
    max_retries: u32,
    limiter: Arc<RateLimiter>,
}

impl Fetcher {
    /// Creates a fetcher
    ///
    /// # Arguments
    ///
    /// * `client` - Transport used for every request
    /// * `user_agent` - User-Agent header value, if any
    /// * `timeout` - Deadline for one attempt, including reading the body
    /// * `max_retries` - Retries for page fetches (attempts = retries + 1)
    /// * `limiter` - Crawl-wide rate limiter
    pub fn new(
        client: Arc<dyn HttpClient>,
        user_agent: Option<String>,
        timeout: Duration,
        max_retries: u32,
        limiter: Arc<RateLimiter>,
    ) -> Self {
        Self {
            client,
            user_agent,
            timeout,
            max_retries,
            limiter,
        }
    }

    /// Fetches a page with GET, retrying per the configured retry count
    pub async fn fetch(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<FetchedPage, FetchError> {
        let exchange = self
            .request(Method::GET, url, BodyMode::Markup, self.max_retries, cancel)
            .await?;

        Ok(FetchedPage {
            status_code: exchange.status_code,
            body: exchange
                .body
                .map(|bytes| String::from_utf8_lossy(&bytes).into_owned()),
        })
    }

    /// Probes a link with HEAD and returns its final status code
    pub async fn probe(&self, url: &str, cancel: &CancellationToken) -> Result<u16, FetchError> {
        let exchange = self
            .request(Method::HEAD, url, BodyMode::Skip, LINK_CHECK_RETRIES, cancel)
            .await?;
        Ok(exchange.status_code)
    }

    /// Fetches an asset with a single GET attempt and measures its size
    pub async fn measure(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<MeasuredAsset, FetchError> {
        let exchange = self
            .request(Method::GET, url, BodyMode::Measure, 0, cancel)
            .await?;

        let size_bytes = match (exchange.content_length, &exchange.body) {
            (Some(length), _) => length,
            (None, Some(body)) => body.len() as u64,
            (None, None) => 0,
        };

        Ok(MeasuredAsset {
            status_code: exchange.status_code,
            size_bytes,
        })
    }

    /// Runs the retry loop around single attempts
    async fn request(
        &self,
        method: Method,
        url: &str,
        mode: BodyMode,
        max_retries: u32,
        cancel: &CancellationToken,
    ) -> Result<Exchange, FetchError> {
        let mut attempt: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(FetchError::Cancelled);
            }

            if attempt > 0 {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(FetchError::Cancelled),
                    _ = time::sleep(RETRY_BACKOFF) => {}
                }
            }

            let outcome = self.attempt(method.clone(), url, mode, cancel).await;

            let retryable = match &outcome {
                Ok(exchange) => is_retryable_status(exchange.status_code),
                Err(e) => e.is_retryable(),
            };

            if !retryable || attempt >= max_retries {
                return outcome;
            }

            attempt += 1;
            match &outcome {
                Ok(exchange) => tracing::debug!(
                    "{} {} returned {}, retrying ({}/{})",
                    method,
                    url,
                    exchange.status_code,
                    attempt,
                    max_retries
                ),
                Err(e) => tracing::debug!(
                    "{} {} failed: {}, retrying ({}/{})",
                    method,
                    url,
                    e,
                    attempt,
                    max_retries
                ),
            }
        }
    }

    /// Performs one rate-limited, timed-out exchange
    async fn attempt(
        &self,
        method: Method,
        url: &str,
        mode: BodyMode,
        cancel: &CancellationToken,
    ) -> Result<Exchange, FetchError> {
        if !self.limiter.wait(cancel).await {
            return Err(FetchError::Cancelled);
        }

        let request = HttpRequest::new(method, url).user_agent(self.user_agent.as_deref());

        let timed_out = || FetchError::Timeout {
            url: url.to_string(),
            timeout: self.timeout,
        };

        match time::timeout(self.timeout, self.exchange(request, mode)).await {
            Ok(Err(FetchError::Timeout { .. })) | Err(_) => Err(timed_out()),
            Ok(result) => result,
        }
    }

    async fn exchange(&self, request: HttpRequest, mode: BodyMode) -> Result<Exchange, FetchError> {
        let response = self.client.send(request).await?;
        let status_code = response.status();
        let content_length = response.content_length();

        let body = match mode {
            BodyMode::Markup if is_success(status_code) && is_markup(&*response) => {
                match response.bytes().await {
                    Ok(bytes) => Some(bytes),
                    Err(e) => {
                        tracing::debug!("Failed to read page body: {}", e);
                        None
                    }
                }
            }
            BodyMode::Measure if status_code < 400 && content_length.is_none() => {
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| FetchError::Transport(format!("failed to read body: {}", e)))?;
                Some(bytes)
            }
            _ => None,
        };

        Ok(Exchange {
            status_code,
            content_length,
            body,
        })
    }
}

fn is_success(status_code: u16) -> bool {
    (200..300).contains(&status_code)
}

/// 429 and 5xx are worth another attempt
fn is_retryable_status(status_code: u16) -> bool {
    status_code == 429 || (500..600).contains(&status_code)
}

fn is_markup(response: &dyn HttpResponse) -> bool {
    response
        .header(CONTENT_TYPE.as_str())
        .map(|value| {
            let value = value.to_ascii_lowercase();
            value.contains("html") || value.contains("xml")
        })
        .unwrap_or(false)
}
