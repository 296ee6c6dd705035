use crate::extract::parse_rating_count;

/// Text extracted from a single detail page
///
/// Built once when the page is parsed; optional fields are `None` when the page
/// had no (or only blank) text for them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawProduct {
    pub title: String,
    /// Breadcrumb text, segments run together
    pub categories: String,
    pub selling_price: String,
    pub price_before_discount: Option<String>,
    pub product_url: String,
    pub brand: String,
    /// Text of the specification block holding the model number
    pub model_number: Option<String>,
    /// Combined score+count rating text
    pub rating: Option<String>,
    pub is_best_seller: bool,
}

impl RawProduct {
    /// Number of ratings, if the rating text carries a parseable count
    pub fn rating_count(&self) -> Option<u32> {
        self.rating.as_deref().and_then(parse_rating_count)
    }
}

/// Folds blank scraped text into `None`
pub(crate) fn non_empty(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_count() {
        let raw = RawProduct {
            rating: Some("4.4250".to_string()),
            ..Default::default()
        };
        assert_eq!(raw.rating_count(), Some(250));
    }

    #[test]
    fn test_rating_count_absent() {
        assert_eq!(RawProduct::default().rating_count(), None);
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(String::new()), None);
        assert_eq!(non_empty("  ".to_string()), None);
        assert_eq!(non_empty("AED 5.00".to_string()), Some("AED 5.00".to_string()));
    }
}
