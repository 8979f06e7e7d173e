/// Page status definitions for the crawl report
///
/// This module derives the reported outcome of a page from its HTTP status.
use serde::Serialize;
use std::fmt;

/// The outcome of fetching a page, as written to the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageStatus {
    /// 2xx response
    Ok,

    /// 3xx response
    Redirect,

    /// 4xx response
    ClientError,

    /// 5xx response (and anything else outside the ranges above)
    ServerError,

    /// No response was received at all
    Error,
}

impl PageStatus {
    /// Derives the page status from an HTTP status code
    ///
    /// A code of 0 means no response was received. This is a pure function of
    /// its input, unlike link health (see the link checker), which treats 3xx
    /// as reachable.
    pub fn from_http_status(code: u16) -> Self {
        match code {
            0 => Self::Error,
            200..=299 => Self::Ok,
            300..=399 => Self::Redirect,
            400..=499 => Self::ClientError,
            _ => Self::ServerError,
        }
    }

    /// Returns true if the page was fetched with a 2xx status
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Returns true if no response was received
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }

    /// Converts the status to its report string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Redirect => "redirect",
            Self::ClientError => "client_error",
            Self::ServerError => "server_error",
            Self::Error => "error",
        }
    }

    /// Returns all possible page statuses
    pub fn all_statuses() -> [Self; 5] {
        [
            Self::Ok,
            Self::Redirect,
            Self::ClientError,
            Self::ServerError,
            Self::Error,
        ]
    }
}

impl fmt::Display for PageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
