//! Report record types
//!
//! These structures define the JSON schema of the crawl report.

use crate::state::PageStatus;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Message recorded when a page got no HTTP response and no better reason is known
pub const NO_RESPONSE_ERROR: &str = "no response received";

/// RFC3339 timestamps with second precision, e.g. `2024-05-01T12:00:00Z`
pub mod rfc3339 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::Serializer;

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(value))
    }

    pub fn format(value: &DateTime<Utc>) -> String {
        value.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

/// Basic on-page SEO signals
///
/// `title` and `description` keep "absent" (`None`) distinct from "present
/// but empty" (`Some("")`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeoData {
    pub has_title: bool,
    pub title: Option<String>,
    pub has_description: bool,
    pub description: Option<String>,
    pub has_h1: bool,
}

/// An outbound link that failed its health check
///
/// Carries either the transport error or the HTTP status code, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokenLink {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BrokenLink {
    pub fn with_status(url: impl Into<String>, status_code: u16) -> Self {
        Self {
            url: url.into(),
            status_code: Some(status_code),
            error: None,
        }
    }

    pub fn with_error(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status_code: None,
            error: Some(error.into()),
        }
    }
}

/// Kind of static asset referenced by a page
///
/// Variants are declared in alphabetical order of their serialized names, so
/// the derived ordering sorts assets the way the report presents them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    Image,
    Other,
    Script,
    Stylesheet,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Other => "other",
            Self::Script => "script",
            Self::Stylesheet => "stylesheet",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Health of one static asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetRecord {
    pub url: String,
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    /// 0 when no response was received
    pub status_code: u16,
    pub size_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AssetRecord {
    pub fn is_healthy(&self) -> bool {
        self.error.is_none()
    }
}

/// Everything the crawl learned about one page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageRecord {
    pub url: String,
    pub depth: u32,
    /// 0 when no response was received
    pub http_status: u16,
    pub status: PageStatus,
    pub error: Option<String>,
    pub seo: SeoData,
    pub broken_links: Option<Vec<BrokenLink>>,
    pub assets: Option<Vec<AssetRecord>>,
    #[serde(with = "rfc3339")]
    pub discovered_at: DateTime<Utc>,
}

impl PageRecord {
    /// Creates the record for a freshly claimed URL
    ///
    /// Until a response is applied the page counts as having no response.
    pub fn new(url: impl Into<String>, depth: u32) -> Self {
        Self {
            url: url.into(),
            depth,
            http_status: 0,
            status: PageStatus::Error,
            error: None,
            seo: SeoData::default(),
            broken_links: None,
            assets: None,
            discovered_at: Utc::now(),
        }
    }

    /// Records the HTTP status of the page response and derives `status`
    pub fn apply_http_status(&mut self, code: u16) {
        self.http_status = code;
        self.status = PageStatus::from_http_status(code);
        if self.status.is_error() && self.error.is_none() {
            self.error = Some(NO_RESPONSE_ERROR.to_string());
        }
    }

    /// Marks the page as failed without a response
    pub fn fail(&mut self, error: impl Into<String>) {
        let error = error.into();
        self.http_status = 0;
        self.status = PageStatus::Error;
        self.error = Some(if error.is_empty() {
            NO_RESPONSE_ERROR.to_string()
        } else {
            error
        });
    }
}

/// The complete crawl report
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub root_url: String,
    pub depth: u32,
    #[serde(with = "rfc3339")]
    pub generated_at: DateTime<Utc>,
    pub pages: Vec<PageRecord>,
}

impl Report {
    /// Encodes the report as JSON
    pub fn to_json(&self, indent: bool) -> Result<String, serde_json::Error> {
        if indent {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }

    /// Finds a page by URL
    pub fn page(&self, url: &str) -> Option<&PageRecord> {
        self.pages.iter().find(|page| page.url == url)
    }
}
