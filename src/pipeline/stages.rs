//! The item transforms applied between channel and CSV file

use crate::extract::{extract_category, extract_model_number, parse_rating, PriceParser};
use crate::pipeline::rank::RankCounter;
use crate::product::{Product, RawProduct};

/// Keeps best sellers and products with enough ratings
#[derive(Debug, Clone, Copy)]
pub struct NotabilityFilter {
    min_rating_count: u32,
}

impl NotabilityFilter {
    pub fn new(min_rating_count: u32) -> Self {
        Self { min_rating_count }
    }

    /// True if the product is a best seller or has more than the minimum rating count
    pub fn keep(&self, raw: &RawProduct) -> bool {
        raw.is_best_seller
            || raw
                .rating_count()
                .map(|count| count > self.min_rating_count)
                .unwrap_or(false)
    }
}

/// Turns raw page text into typed products and assigns their rank
#[derive(Debug, Clone)]
pub struct ProductTyper {
    website: String,
    prices: PriceParser,
    ranks: RankCounter,
}

impl ProductTyper {
    pub fn new(website: impl Into<String>, prices: PriceParser, ranks: RankCounter) -> Self {
        Self {
            website: website.into(),
            prices,
            ranks,
        }
    }

    /// Types one product
    ///
    /// Extraction failures are logged and leave the field at zero (selling price) or
    /// absent (everything optional); the product is always produced.
    pub fn type_product(&self, raw: RawProduct) -> Product {
        let selling_price = match self.prices.extract(&raw.selling_price) {
            Ok(price) => price,
            Err(e) => {
                tracing::warn!(
                    "Failed to parse selling price '{}' of {}: {}",
                    raw.selling_price,
                    raw.product_url,
                    e
                );
                Default::default()
            }
        };

        let price_before_discount = raw.price_before_discount.as_deref().and_then(|text| {
            self.prices
                .extract(text)
                .map_err(|e| {
                    tracing::warn!(
                        "Failed to parse price before discount '{}' of {}: {}",
                        text,
                        raw.product_url,
                        e
                    )
                })
                .ok()
        });

        let sku = raw.model_number.as_deref().and_then(|text| {
            extract_model_number(text)
                .map_err(|e| tracing::warn!("No model number for {}: {}", raw.product_url, e))
                .ok()
        });

        let rating = raw.rating.as_deref().map(parse_rating).unwrap_or_default();

        Product {
            category: extract_category(&raw.categories),
            website: self.website.clone(),
            title: raw.title,
            selling_price,
            price_before_discount,
            currency: self.prices.currency().to_string(),
            product_url: raw.product_url,
            sku,
            brand: raw.brand,
            rating_score: rating.score,
            rating_count: rating.count,
            rank: self.ranks.next(),
            is_best_seller: raw.is_best_seller,
        }
    }
}
