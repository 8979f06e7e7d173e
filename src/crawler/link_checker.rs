//! Broken link detection
//!
//! Every outbound link on a page is probed with HEAD through the shared
//! fetcher. A link is healthy when its final status is in `[200, 400)`;
//! redirects count as reachable here even though a redirecting page is
//! reported with status `redirect`.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::pool::TaskPool;
use crate::output::BrokenLink;
use crate::FetchError;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Concurrent link prober
pub struct LinkChecker {
    fetcher: Arc<Fetcher>,
    workers: usize,
}

impl LinkChecker {
    /// Creates a checker running at most `workers` probes at once per page
    pub fn new(fetcher: Arc<Fetcher>, workers: usize) -> Self {
        Self { fetcher, workers }
    }

    /// Probes `links` and returns the unhealthy ones with a completion timestamp
    ///
    /// The order of the returned links is unspecified. An empty input
    /// returns immediately without touching the network. Links left
    /// unprobed by cancellation are reported broken with the cancellation
    /// error.
    pub async fn check(
        &self,
        links: &[String],
        cancel: &CancellationToken,
    ) -> (Vec<BrokenLink>, DateTime<Utc>) {
        if links.is_empty() {
            return (Vec::new(), Utc::now());
        }

        let mut pool = TaskPool::new(self.workers);
        let mut unprobed: &[String] = &[];
        for (index, link) in links.iter().enumerate() {
            let fetcher = Arc::clone(&self.fetcher);
            let link = link.clone();
            let task_cancel = cancel.clone();
            let submitted = pool
                .submit(
                    async move { check_link(&fetcher, &link, &task_cancel).await },
                    cancel,
                )
                .await;
            if !submitted {
                unprobed = &links[index..];
                break;
            }
        }

        let mut broken: Vec<BrokenLink> = pool.join().await.into_iter().flatten().collect();
        broken.extend(
            unprobed
                .iter()
                .map(|link| BrokenLink::with_error(link, FetchError::Cancelled.to_string())),
        );
        tracing::debug!("Checked {} links, {} broken", links.len(), broken.len());

        (broken, Utc::now())
    }
}

/// Probes one link, returning a record only if it is unhealthy
async fn check_link(fetcher: &Fetcher, url: &str, cancel: &CancellationToken) -> Option<BrokenLink> {
    match fetcher.probe(url, cancel).await {
        Ok(status) if is_healthy(status) => None,
        Ok(status) => Some(BrokenLink::with_status(url, status)),
        Err(e) => Some(BrokenLink::with_error(url, e.to_string())),
    }
}

fn is_healthy(status: u16) -> bool {
    (200..400).contains(&status)
}
