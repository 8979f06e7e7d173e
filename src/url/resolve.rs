use crate::url::normalize_url;
use url::Url;

/// Prefixes of hrefs that never point at a fetchable resource
const IGNORED_PREFIXES: &[&str] = &["#", "javascript:", "mailto:", "tel:", "data:"];

/// Resolves an href found on a page to an absolute, normalized URL
///
/// Returns None if the link should be ignored:
/// - empty hrefs
/// - fragment-only links (same page anchors)
/// - `javascript:`, `mailto:`, `tel:` and `data:` links
/// - anything that does not resolve to HTTP(S)
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if IGNORED_PREFIXES
        .iter()
        .any(|prefix| lowered.starts_with(prefix))
    {
        return None;
    }

    let resolved = base_url.join(href).ok()?;
    match resolved.scheme() {
        "http" | "https" => Some(normalize_url(&resolved)),
        _ => None,
    }
}
