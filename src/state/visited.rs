use std::collections::HashSet;
use std::sync::Mutex;

/// Thread-safe set of URLs that have been claimed for processing
///
/// A URL enters the set when a worker claims it, never when it is queued, and
/// is never removed. [`VisitedSet::claim`] is the single de-duplication point
/// of a crawl.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically checks and marks a URL
    ///
    /// # Returns
    ///
    /// * `true` - The caller now owns the URL and must process it
    /// * `false` - Another worker already claimed it
    pub fn claim(&self, url: &str) -> bool {
        let mut urls = self.urls.lock().unwrap_or_else(|e| e.into_inner());
        if urls.contains(url) {
            return false;
        }
        urls.insert(url.to_string())
    }

    /// Returns whether a URL has been claimed
    pub fn contains(&self, url: &str) -> bool {
        let urls = self.urls.lock().unwrap_or_else(|e| e.into_inner());
        urls.contains(url)
    }

    /// Returns the number of claimed URLs
    pub fn len(&self) -> usize {
        let urls = self.urls.lock().unwrap_or_else(|e| e.into_inner());
        urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
