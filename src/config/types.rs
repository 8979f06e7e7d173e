use serde::Deserialize;
use std::time::Duration;

/// Default maximum crawl depth
pub const DEFAULT_DEPTH: u32 = 10;

/// Default number of retries for page fetches
pub const DEFAULT_RETRIES: u32 = 1;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Default number of concurrent page workers
pub const DEFAULT_WORKERS: usize = 4;

/// Fully resolved options for a single crawl
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlOptions {
    /// Root URL as given by the user (scheme optional)
    pub url: String,

    /// Maximum crawl depth; the root is depth 0
    pub depth: u32,

    /// Retries for page fetches after the first attempt
    pub retries: u32,

    /// Global interval between outgoing requests (zero disables pacing)
    pub delay: Duration,

    /// Per-request timeout
    pub timeout: Duration,

    /// Optional User-Agent header value
    pub user_agent: Option<String>,

    /// Concurrent page workers; also sizes link and asset fan-out
    pub workers: usize,

    /// Pretty-print the JSON report
    pub indent_json: bool,
}

impl CrawlOptions {
    /// Creates options for `url` with every other field at its default
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            depth: DEFAULT_DEPTH,
            retries: DEFAULT_RETRIES,
            delay: Duration::ZERO,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
            workers: DEFAULT_WORKERS,
            indent_json: true,
        }
    }
}

/// Top-level structure of a TOML configuration file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub crawler: CrawlerSettings,
}

/// Partially specified crawler settings
///
/// Used both for the `[crawler]` table of a config file and for flags given on
/// the command line, so the two sources can be layered with [`CrawlerSettings::or`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct CrawlerSettings {
    pub depth: Option<u32>,
    pub retries: Option<u32>,
    /// Duration string, e.g. "200ms"
    pub delay: Option<String>,
    /// Duration string, e.g. "15s"
    pub timeout: Option<String>,
    /// Requests per second; overrides `delay` when greater than zero
    pub rps: Option<u32>,
    pub user_agent: Option<String>,
    pub workers: Option<usize>,
    pub indent: Option<bool>,
}

impl CrawlerSettings {
    /// Layers `self` over `fallback`: fields set here win
    pub fn or(self, fallback: CrawlerSettings) -> CrawlerSettings {
        CrawlerSettings {
            depth: self.depth.or(fallback.depth),
            retries: self.retries.or(fallback.retries),
            delay: self.delay.or(fallback.delay),
            timeout: self.timeout.or(fallback.timeout),
            rps: self.rps.or(fallback.rps),
            user_agent: self.user_agent.or(fallback.user_agent),
            workers: self.workers.or(fallback.workers),
            indent: self.indent.or(fallback.indent),
        }
    }
}
