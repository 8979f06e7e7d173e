//! Output module for the crawl report
//!
//! This module handles:
//! - The record types that make up the JSON report
//! - Thread-safe aggregation of page records
//! - End-of-crawl statistics

mod report;
pub mod stats;
mod types;

pub use report::ReportBuilder;
pub use stats::{log_statistics, CrawlStatistics};
pub use types::{
    rfc3339, AssetRecord, AssetType, BrokenLink, PageRecord, Report, SeoData, NO_RESPONSE_ERROR,
};
