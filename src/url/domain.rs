use url::Url;

/// Extracts the lowercase host from a URL
///
/// Politeness slots are keyed by this value, so two URLs on the same host share
/// one concurrency budget regardless of path or port.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use shelf_scout::url::extract_domain;
///
/// let url = Url::parse("https://WWW.Noon.com/uae-en/p/1").unwrap();
/// assert_eq!(extract_domain(&url), Some("www.noon.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}
