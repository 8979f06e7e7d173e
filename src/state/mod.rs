//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageStatus`: The reported outcome of a page, derived from its HTTP status
//! - `Frontier`: FIFO queue of URLs waiting to be crawled
//! - `VisitedSet`: URLs already claimed by a worker

mod frontier;
mod page_status;
mod visited;

// Re-export main types
pub use frontier::{Frontier, FrontierEntry};
pub use page_status::PageStatus;
pub use visited::VisitedSet;
