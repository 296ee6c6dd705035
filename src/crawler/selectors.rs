//! CSS selectors for the storefront's listing and detail pages

use crate::ScrapeError;
use scraper::Selector;

fn parse_selector(selector: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(selector).map_err(|e| ScrapeError::Selector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

/// Selectors for a listing page
#[derive(Debug, Clone)]
pub struct ListingSelectors {
    /// One element per listed product
    pub item: Selector,
    /// The product link inside an item
    pub link: Selector,
}

impl ListingSelectors {
    pub fn new() -> Result<Self, ScrapeError> {
        Ok(Self {
            item: parse_selector(".productContainer")?,
            link: parse_selector("a[href]")?,
        })
    }
}

/// Selectors for a product detail page, relative to `root`
#[derive(Debug, Clone)]
pub struct DetailSelectors {
    pub root: Selector,
    pub title: Selector,
    pub breadcrumbs: Selector,
    pub price_now: Selector,
    pub price_was: Selector,
    pub brand: Selector,
    pub model_number: Selector,
    pub rating: Selector,
    pub best_seller: Selector,
}

impl DetailSelectors {
    pub fn new() -> Result<Self, ScrapeError> {
        Ok(Self {
            root: parse_selector("div[id=__next]")?,
            title: parse_selector("h1")?,
            breadcrumbs: parse_selector("div[data-qa=breadcrumbs-list]")?,
            price_now: parse_selector(".priceNow")?,
            price_was: parse_selector(".priceWas")?,
            brand: parse_selector("div[data-qa^=pdp-brand-]")?,
            model_number: parse_selector(".modelNumber")?,
            rating: parse_selector(".isPdp")?,
            best_seller: parse_selector(".bestSellerLink")?,
        })
    }
}
