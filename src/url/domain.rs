use url::Url;

/// Returns true if `candidate` lives on the same site as `root`
///
/// Hosts are compared exactly (no subdomain folding) together with the
/// effective port, so `example.com` and `example.com:8080` are different sites.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use pagewalk::url::is_same_domain;
///
/// let root = Url::parse("https://example.com/").unwrap();
/// assert!(is_same_domain(&Url::parse("https://example.com/about").unwrap(), &root));
/// assert!(!is_same_domain(&Url::parse("https://blog.example.com/").unwrap(), &root));
/// ```
pub fn is_same_domain(candidate: &Url, root: &Url) -> bool {
    candidate.host_str().is_some()
        && candidate.host_str() == root.host_str()
        && candidate.port_or_known_default() == root.port_or_known_default()
}
