use url::Url;

/// Builds the listing URL (without page number) from the site root and listing path
pub fn listing_base_url(root: &str, listing_path: &str) -> Result<Url, url::ParseError> {
    Url::parse(root)?.join(listing_path)
}

/// Returns the URL of one listing page
///
/// The page number is appended as an extra query pair, leaving any existing
/// (possibly pre-encoded) query untouched.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use shelf_scout::url::listing_page_url;
///
/// let base = Url::parse("https://www.noon.com/uae-en/beauty/?limit=50").unwrap();
/// let page = listing_page_url(&base, "page", 3);
/// assert_eq!(page.as_str(), "https://www.noon.com/uae-en/beauty/?limit=50&page=3");
/// ```
pub fn listing_page_url(base: &Url, page_param: &str, page: u32) -> Url {
    let mut url = base.clone();
    url.query_pairs_mut()
        .append_pair(page_param, &page.to_string());
    url
}

/// Resolves a listing item's href against the site root
///
/// Returns None if the link should be skipped:
/// - empty or fragment-only hrefs
/// - javascript:, mailto:, tel: and data: links
/// - anything that does not resolve to HTTP(S)
pub fn resolve_link(href: &str, root: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match root.join(href) {
        Ok(absolute) if absolute.scheme() == "http" || absolute.scheme() == "https" => {
            Some(absolute)
        }
        _ => None,
    }
}
