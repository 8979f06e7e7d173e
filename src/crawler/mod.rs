//! Crawler module for page fetching and checking
//!
//! This module contains the core crawling logic, including:
//! - Crawl-wide rate limiting
//! - HTTP fetching with retry logic
//! - Broken link and asset checks
//! - HTML parsing and link extraction
//! - Overall crawl coordination

mod asset_checker;
mod client;
mod coordinator;
mod fetcher;
mod limiter;
mod link_checker;
mod parser;
mod pool;

#[cfg(test)]
pub(crate) mod mock;

pub use asset_checker::AssetChecker;
pub use client::{HttpClient, HttpRequest, HttpResponse, ReqwestClient};
pub use coordinator::Coordinator;
pub use fetcher::{FetchedPage, Fetcher, MeasuredAsset, LINK_CHECK_RETRIES, RETRY_BACKOFF};
pub use limiter::RateLimiter;
pub use link_checker::LinkChecker;
pub use parser::{extract_assets, extract_links, extract_seo, parse_page, AssetRef, ParsedPage};
pub use pool::TaskPool;

use crate::config::{self, CrawlOptions};
use crate::output::Report;
use crate::url::parse_root_url;
use crate::PagewalkError;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Crawls a site through the given HTTP client
///
/// Options are normalized first. Only an invalid root URL fails the call;
/// every fetch, link and asset failure is recorded in the report.
///
/// # Arguments
///
/// * `options` - The crawl options
/// * `client` - Transport for every request
/// * `cancel` - Stops the crawl early; the partial report is still returned
pub async fn analyze(
    mut options: CrawlOptions,
    client: Arc<dyn HttpClient>,
    cancel: CancellationToken,
) -> Result<Report, PagewalkError> {
    config::normalize(&mut options);
    let root = parse_root_url(&options.url)?;

    let report = Coordinator::new(&options, root, client, cancel).run().await;
    Ok(report)
}

/// Crawls a site over the network
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the root URL
/// 2. Build the HTTP client
/// 3. Crawl same-domain pages up to the configured depth
/// 4. Return the report with pages sorted by URL
pub async fn run_crawl(
    mut options: CrawlOptions,
    cancel: CancellationToken,
) -> Result<Report, PagewalkError> {
    config::normalize(&mut options);
    parse_root_url(&options.url)?;

    let client = ReqwestClient::new(options.timeout)?;
    analyze(options, Arc::new(client), cancel).await
}
