//! Pagewalk: a concurrent site auditor
//!
//! This crate crawls a website from a root URL, staying on the root's domain,
//! and reports HTTP status, SEO signals, broken outbound links and static asset
//! health for every page it reaches, as a deterministic JSON report.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use std::time::Duration;
use thiserror::Error;

/// Main error type for Pagewalk operations
///
/// Only root URL validation, configuration and client construction abort a
/// run. Everything that goes wrong while crawling is recorded on the page,
/// link or asset that produced it.
#[derive(Debug, Error)]
pub enum PagewalkError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid URL: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("{0}")]
    Parse(String),

    #[error("unsupported scheme: {0}")]
    InvalidScheme(String),

    #[error("no host")]
    MissingHost,
}

/// Errors produced by a single HTTP exchange
///
/// HTTP error statuses are not represented here; a 404 or 503 is a
/// successful exchange whose status code is inspected by the caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The crawl was cancelled before or while waiting to issue the request
    #[error("request cancelled")]
    Cancelled,

    #[error("request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    /// DNS, connect, TLS or body read failure
    #[error("{0}")]
    Transport(String),

    /// The request could not be built (bad URL, bad header value)
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl FetchError {
    /// Returns true if another attempt could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Transport(_))
    }

    /// Returns true if this error is the crawl-wide cancellation signal
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Result type alias for Pagewalk operations
pub type Result<T> = std::result::Result<T, PagewalkError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::CrawlOptions;
pub use crawler::{analyze, run_crawl};
pub use output::{PageRecord, Report};
pub use state::PageStatus;
