use crate::config::types::{CrawlOptions, DEFAULT_TIMEOUT, DEFAULT_WORKERS};
use crate::ConfigError;
use reqwest::header::HeaderValue;

/// Replaces degenerate values with their defaults
///
/// A zero worker count or a zero timeout would stall the crawl, so both fall
/// back to the defaults instead of being rejected.
pub fn normalize(options: &mut CrawlOptions) {
    if options.workers == 0 {
        options.workers = DEFAULT_WORKERS;
    }

    if options.timeout.is_zero() {
        options.timeout = DEFAULT_TIMEOUT;
    }
}

/// Validates crawl options
pub fn validate(options: &CrawlOptions) -> Result<(), ConfigError> {
    if options.url.trim().is_empty() {
        return Err(ConfigError::Validation("url cannot be empty".to_string()));
    }

    if let Some(user_agent) = &options.user_agent {
        HeaderValue::from_str(user_agent).map_err(|_| {
            ConfigError::Validation(format!(
                "user agent '{}' is not a valid header value",
                user_agent.escape_debug()
            ))
        })?;
    }

    Ok(())
}
