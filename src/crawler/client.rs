//! HTTP transport seam
//!
//! The crawler talks to the network through [`HttpClient`], so tests can
//! substitute an in-process implementation. [`ReqwestClient`] is the
//! production implementation.

use crate::FetchError;
use async_trait::async_trait;
use reqwest::header::{CONTENT_LENGTH, USER_AGENT};
use reqwest::{Client, Method};
use std::time::Duration;

/// A single outbound request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub user_agent: Option<String>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            user_agent: None,
        }
    }

    pub fn user_agent(mut self, user_agent: Option<&str>) -> Self {
        self.user_agent = user_agent.map(str::to_string);
        self
    }
}

/// Response headers have been received; the body has not been read yet
#[async_trait]
pub trait HttpResponse: Send {
    fn status(&self) -> u16;

    /// Returns a response header value, if present and valid UTF-8
    fn header(&self, name: &str) -> Option<String>;

    /// Returns the declared Content-Length, if any
    ///
    /// Read from the header rather than the decoder, which reports nothing
    /// for compressed bodies.
    fn content_length(&self) -> Option<u64> {
        self.header(CONTENT_LENGTH.as_str())
            .and_then(|value| value.trim().parse().ok())
    }

    /// Reads the entire body
    async fn bytes(self: Box<Self>) -> Result<Vec<u8>, FetchError>;
}

/// Sends requests and returns responses whose body is read lazily
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<Box<dyn HttpResponse>, FetchError>;
}

/// reqwest-backed client
///
/// Redirects are followed by reqwest (up to 10 hops), so the status seen by
/// the crawler is that of the final hop.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: Client,
}

impl ReqwestClient {
    /// Builds the client
    ///
    /// # Arguments
    ///
    /// * `timeout` - Overall per-request timeout, applied by reqwest as well
    ///   as by the fetcher
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn send(&self, request: HttpRequest) -> Result<Box<dyn HttpResponse>, FetchError> {
        let mut builder = self.client.request(request.method, &request.url);
        if let Some(user_agent) = &request.user_agent {
            builder = builder.header(USER_AGENT, user_agent);
        }

        let response = builder.send().await.map_err(classify_error)?;
        Ok(Box::new(ReqwestResponse { response }))
    }
}

struct ReqwestResponse {
    response: reqwest::Response,
}

#[async_trait]
impl HttpResponse for ReqwestResponse {
    fn status(&self) -> u16 {
        self.response.status().as_u16()
    }

    fn header(&self, name: &str) -> Option<String> {
        self.response
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    }

    async fn bytes(self: Box<Self>) -> Result<Vec<u8>, FetchError> {
        let body = self.response.bytes().await.map_err(classify_error)?;
        Ok(body.to_vec())
    }
}

/// Maps a reqwest error to the crawler's error classes
fn classify_error(error: reqwest::Error) -> FetchError {
    if error.is_builder() {
        FetchError::InvalidRequest(error.to_string())
    } else if error.is_timeout() {
        FetchError::Timeout {
            url: error
                .url()
                .map(|url| url.to_string())
                .unwrap_or_default(),
            timeout: Duration::ZERO,
        }
    } else {
        FetchError::Transport(error.to_string())
    }
}
