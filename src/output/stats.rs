//! Statistics generation from a finished crawl report
//!
//! This module summarizes a report into counts for the end-of-crawl log line.

use crate::output::types::Report;
use crate::state::PageStatus;
use std::collections::BTreeMap;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Total number of pages in the report
    pub total_pages: u64,

    /// Count of pages by status
    pub pages_by_status: BTreeMap<PageStatus, u64>,

    /// Broken links across all pages
    pub broken_links: u64,

    /// Asset references across all pages (cached hits included)
    pub total_assets: u64,

    /// Asset references that carry an error
    pub failed_assets: u64,

    /// Deepest level reached
    pub max_depth_reached: u32,
}

impl CrawlStatistics {
    /// Computes statistics for a report
    pub fn from_report(report: &Report) -> Self {
        let mut stats = Self::default();

        for page in &report.pages {
            stats.total_pages += 1;
            *stats.pages_by_status.entry(page.status).or_insert(0) += 1;
            stats.max_depth_reached = stats.max_depth_reached.max(page.depth);

            if let Some(links) = &page.broken_links {
                stats.broken_links += links.len() as u64;
            }
            if let Some(assets) = &page.assets {
                stats.total_assets += assets.len() as u64;
                stats.failed_assets += assets.iter().filter(|a| !a.is_healthy()).count() as u64;
            }
        }

        stats
    }

    /// Returns the number of pages with the given status
    pub fn count(&self, status: PageStatus) -> u64 {
        self.pages_by_status.get(&status).copied().unwrap_or(0)
    }

    /// Returns the share of pages with status `ok`, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_pages == 0 {
            return 0.0;
        }
        (self.count(PageStatus::Ok) as f64 / self.total_pages as f64) * 100.0
    }
}

/// Logs statistics through tracing
///
/// # Arguments
///
/// * `stats` - The statistics to log
pub fn log_statistics(stats: &CrawlStatistics) {
    let breakdown = stats
        .pages_by_status
        .iter()
        .map(|(status, count)| format!("{}={}", status, count))
        .collect::<Vec<_>>()
        .join(", ");

    tracing::info!(
        "Crawl statistics: {} pages ({:.1}% ok) [{}], max depth {}, {} broken links, {}/{} assets failed",
        stats.total_pages,
        stats.success_rate(),
        breakdown,
        stats.max_depth_reached,
        stats.broken_links,
        stats.failed_assets,
        stats.total_assets
    );
}
