use crate::extract::normalize_spaces;
use regex::Regex;
use std::sync::LazyLock;

static CASE_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-z][A-Z]").expect("case boundary pattern is valid")
});

/// Returns the most specific category of a run-together breadcrumb
///
/// Breadcrumb text arrives without separators ("HomeKitchenAppliances"); a segment
/// starts at every lowercase-to-uppercase transition and the last segment wins. Text
/// without any transition is returned whole.
///
/// # Examples
///
/// ```
/// use shelf_scout::extract::extract_category;
///
/// assert_eq!(extract_category("HomeKitchenAppliances"), "Appliances");
/// assert_eq!(extract_category("Electronics"), "Electronics");
/// ```
pub fn extract_category(text: &str) -> String {
    let text = normalize_spaces(text);
    match CASE_BOUNDARY.find_iter(&text).last() {
        // The boundary match is "xY"; the segment starts at the uppercase letter
        Some(boundary) => text[boundary.start() + 1..].to_string(),
        None => text,
    }
}
