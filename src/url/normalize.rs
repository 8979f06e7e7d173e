use crate::UrlError;
use url::Url;

/// Parses and validates the root URL of a crawl
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace
/// 2. Default the scheme to `https://` when the input has none
/// 3. Parse the URL; reject if malformed
/// 4. Reject schemes other than HTTP and HTTPS
/// 5. Reject URLs without a host
/// 6. Remove the fragment
///
/// # Arguments
///
/// * `input` - The URL as typed by the user
///
/// # Returns
///
/// * `Ok(Url)` - The normalized root URL
/// * `Err(UrlError)` - The input cannot be crawled
///
/// # Examples
///
/// ```
/// use pagewalk::url::parse_root_url;
///
/// let url = parse_root_url("example.com/docs#intro").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/docs");
/// ```
pub fn parse_root_url(input: &str) -> Result<Url, UrlError> {
    let trimmed = input.trim();
    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let url = Url::parse(&with_scheme).map_err(|e| match e {
        url::ParseError::EmptyHost => UrlError::MissingHost,
        other => UrlError::Parse(other.to_string()),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    Ok(normalize_url(&url))
}

/// Returns the canonical form used for de-duplication
///
/// Fragments never change the fetched resource, so they are dropped. Host
/// lowercasing and dot-segment removal are already done by the URL parser.
pub fn normalize_url(url: &Url) -> Url {
    let mut normalized = url.clone();
    normalized.set_fragment(None);
    normalized
}
