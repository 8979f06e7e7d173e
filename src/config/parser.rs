use crate::config::types::{CrawlOptions, CrawlerSettings, FileConfig};
use crate::config::validation::{normalize, validate};
use crate::ConfigError;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Loads a TOML configuration file
///
/// # Arguments
///
/// * `path` - Path to the TOML file
///
/// # Returns
///
/// * `Ok(FileConfig)` - Successfully parsed file
/// * `Err(ConfigError)` - Failed to read or parse the file
pub fn load_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parses TOML configuration from a string
pub fn parse_config(contents: &str) -> Result<FileConfig, ConfigError> {
    Ok(toml::from_str(contents)?)
}

/// Resolves layered settings into crawl options for `url`
///
/// Unset fields fall back to built-in defaults. A positive `rps` overrides
/// `delay` with one second divided by `rps`. The result is normalized and
/// validated before it is returned.
pub fn resolve_options(url: &str, settings: CrawlerSettings) -> Result<CrawlOptions, ConfigError> {
    let mut options = CrawlOptions::new(url);

    if let Some(depth) = settings.depth {
        options.depth = depth;
    }
    if let Some(retries) = settings.retries {
        options.retries = retries;
    }
    if let Some(delay) = settings.delay.as_deref() {
        options.delay = parse_duration(delay)?;
    }
    if let Some(timeout) = settings.timeout.as_deref() {
        options.timeout = parse_duration(timeout)?;
    }
    if let Some(rps) = settings.rps.filter(|rps| *rps > 0) {
        options.delay = Duration::from_secs(1) / rps;
    }
    if let Some(user_agent) = settings.user_agent.filter(|ua| !ua.is_empty()) {
        options.user_agent = Some(user_agent);
    }
    if let Some(workers) = settings.workers {
        options.workers = workers;
    }
    if let Some(indent) = settings.indent {
        options.indent_json = indent;
    }

    normalize(&mut options);
    validate(&options)?;
    Ok(options)
}

/// Parses a duration string such as `1m30s`
///
/// Accepts a sequence of decimal numbers, each with an optional fraction and a
/// unit suffix: `ns`, `us` (or `µs`), `ms`, `s`, `m`, `h`. A bare `0` is zero.
///
/// # Example
///
/// ```
/// use pagewalk::config::parse_duration;
/// use std::time::Duration;
///
/// assert_eq!(parse_duration("1m30s").unwrap(), Duration::from_secs(90));
/// assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
/// ```
pub fn parse_duration(input: &str) -> Result<Duration, ConfigError> {
    let s = input.trim();
    let invalid = || ConfigError::InvalidDuration(input.to_string());

    if s.is_empty() {
        return Err(invalid());
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }

    let mut total_nanos: f64 = 0.0;
    let mut rest = s;

    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(invalid)?;
        if number_len == 0 {
            return Err(invalid());
        }
        let value: f64 = rest[..number_len].parse().map_err(|_| invalid())?;
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let nanos_per_unit = match &rest[..unit_len] {
            "ns" => 1.0,
            "us" | "µs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60.0 * 1e9,
            "h" => 3600.0 * 1e9,
            _ => return Err(invalid()),
        };
        rest = &rest[unit_len..];

        total_nanos += value * nanos_per_unit;
    }

    if !total_nanos.is_finite() || total_nanos > u64::MAX as f64 {
        return Err(invalid());
    }

    Ok(Duration::from_nanos(total_nanos.round() as u64))
}
