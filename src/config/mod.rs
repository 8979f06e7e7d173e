//! Configuration module for Pagewalk
//!
//! Options come from three layers: command-line flags, an optional TOML file
//! and built-in defaults, in that order of precedence.
//!
//! # Example
//!
//! ```no_run
//! use pagewalk::config::{load_config, resolve_options, CrawlerSettings};
//! use std::path::Path;
//!
//! let file = load_config(Path::new("pagewalk.toml")).unwrap();
//! let cli = CrawlerSettings { depth: Some(2), ..Default::default() };
//! let options = resolve_options("example.com", cli.or(file.crawler)).unwrap();
//! println!("Crawler will use max depth: {}", options.depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CrawlOptions, CrawlerSettings, FileConfig, DEFAULT_DEPTH, DEFAULT_RETRIES, DEFAULT_TIMEOUT,
    DEFAULT_WORKERS,
};

// Re-export parser functions
pub use parser::{load_config, parse_config, parse_duration, resolve_options};
pub use validation::{normalize, validate};
