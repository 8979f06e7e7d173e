use std::collections::VecDeque;
use std::sync::Mutex;

/// A URL waiting to be crawled, with its distance from the root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// Normalized absolute URL
    pub url: String,

    /// Link distance from the root (the root is 0)
    pub depth: u32,
}

impl FrontierEntry {
    pub fn new(url: impl Into<String>, depth: u32) -> Self {
        Self {
            url: url.into(),
            depth,
        }
    }
}

/// Thread-safe FIFO queue of URLs to crawl
///
/// The frontier does not de-duplicate and does not enforce depth limits; the
/// same URL may be queued several times and is filtered when a worker claims
/// it from the [`VisitedSet`](crate::state::VisitedSet).
#[derive(Debug, Default)]
pub struct Frontier {
    queue: Mutex<VecDeque<FrontierEntry>>,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a frontier holding a single root entry at depth 0
    pub fn with_root(url: impl Into<String>) -> Self {
        let frontier = Self::new();
        frontier.enqueue(vec![FrontierEntry::new(url, 0)]);
        frontier
    }

    /// Appends entries to the tail of the queue
    pub fn enqueue(&self, entries: Vec<FrontierEntry>) {
        if entries.is_empty() {
            return;
        }
        let mut queue = self.queue.lock().unwrap_or_else(|e| e.into_inner());
        queue.extend(entries);
    }

    /// Removes and returns the head of the queue, or None if it is empty
    pub fn dequeue(&self) -> Option<FrontierEntry> {
        let mut queue = self.queue.lock().unwrap_or_else(|e| e.into_inner());
        queue.pop_front()
    }

    /// Returns whether the queue is empty
    pub fn is_empty(&self) -> bool {
        let queue = self.queue.lock().unwrap_or_else(|e| e.into_inner());
        queue.is_empty()
    }

    /// Returns the number of queued entries
    pub fn len(&self) -> usize {
        let queue = self.queue.lock().unwrap_or_else(|e| e.into_inner());
        queue.len()
    }
}
