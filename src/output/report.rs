//! Thread-safe report aggregation

use crate::output::types::{PageRecord, Report};
use chrono::Utc;
use std::sync::Mutex;
use url::Url;

/// Collects finished page records from concurrent workers
///
/// Workers only append. Pages are sorted by URL when the report is taken, so
/// the output does not depend on completion order.
#[derive(Debug)]
pub struct ReportBuilder {
    root_url: String,
    depth: u32,
    pages: Mutex<Vec<PageRecord>>,
}

impl ReportBuilder {
    pub fn new(root_url: &Url, depth: u32) -> Self {
        Self {
            root_url: root_url.to_string(),
            depth,
            pages: Mutex::new(Vec::new()),
        }
    }

    /// Appends a finalized page record
    ///
    /// Error pages have their sub-collections cleared to `None`; every other
    /// page gets empty collections in place of missing ones.
    pub fn add_page(&self, mut page: PageRecord) {
        if page.status.is_error() {
            page.broken_links = None;
            page.assets = None;
        } else {
            page.broken_links.get_or_insert_with(Vec::new);
            page.assets.get_or_insert_with(Vec::new);
        }

        let mut pages = self.pages.lock().unwrap_or_else(|e| e.into_inner());
        pages.push(page);
    }

    /// Returns the number of pages recorded so far
    pub fn len(&self) -> usize {
        let pages = self.pages.lock().unwrap_or_else(|e| e.into_inner());
        pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Takes the recorded pages and returns the report with pages sorted by URL
    pub fn finish(&self) -> Report {
        let mut pages = {
            let mut pages = self.pages.lock().unwrap_or_else(|e| e.into_inner());
            std::mem::take(&mut *pages)
        };
        pages.sort_by(|a, b| a.url.cmp(&b.url));

        Report {
            root_url: self.root_url.clone(),
            depth: self.depth,
            generated_at: Utc::now(),
            pages,
        }
    }
}
