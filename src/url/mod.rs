//! URL handling module for Pagewalk
//!
//! This module provides root URL validation, link resolution and the
//! same-domain predicate that keeps a crawl on its site.

mod domain;
mod normalize;
mod resolve;

// Re-export main functions
pub use domain::is_same_domain;
pub use normalize::{normalize_url, parse_root_url};
pub use resolve::resolve_link;
