//! Field extraction from raw page text
//!
//! Pure functions that turn the text scraped from a detail page into typed values:
//! - currency amounts (`PriceParser`)
//! - the most specific category of a breadcrumb blob
//! - the model number
//! - the combined rating score/count string

mod category;
mod model;
mod price;
mod rating;

pub use category::extract_category;
pub use model::extract_model_number;
pub use price::PriceParser;
pub use rating::{parse_rating, parse_rating_count, parse_rating_score, Rating};

/// Replaces non-breaking spaces, which storefronts sprinkle between currency and amount
pub(crate) fn normalize_spaces(text: &str) -> String {
    text.replace('\u{00A0}', " ")
}
