//! Detail page visits
//!
//! A visit fetches one product page, lifts its fields into a `RawProduct` and sends it
//! down the item channel. Every visit ends in a `VisitOutcome`; none of them abort
//! the crawl.

use crate::crawler::fetcher::Fetch;
use crate::crawler::selectors::DetailSelectors;
use crate::crawler::site_crawler::Crawler;
use crate::product::{non_empty, RawProduct};
use crate::FetchError;
use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use url::Url;

/// Result of a single detail visit
#[derive(Debug)]
pub enum VisitOutcome {
    /// A raw product was handed to the pipeline
    Emitted,
    /// The page loaded but held no product
    Skipped { url: String },
    /// The fetch was abandoned after retries
    Failed(FetchError),
    /// The pipeline had already stopped accepting items
    Undelivered { url: String },
}

/// Concatenated, trimmed text of every element matching `selector` under `root`
fn child_text(root: &ElementRef<'_>, selector: &Selector) -> String {
    root.select(selector)
        .flat_map(|element| element.text())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Lifts the product fields out of a detail page
///
/// Returns None if the page has no product root element.
pub fn extract_raw_product(
    html: &str,
    url: &Url,
    selectors: &DetailSelectors,
) -> Option<RawProduct> {
    let document = Html::parse_document(html);
    let root = document.select(&selectors.root).next()?;

    Some(RawProduct {
        title: child_text(&root, &selectors.title),
        categories: child_text(&root, &selectors.breadcrumbs),
        selling_price: child_text(&root, &selectors.price_now),
        price_before_discount: non_empty(child_text(&root, &selectors.price_was)),
        product_url: url.to_string(),
        brand: child_text(&root, &selectors.brand),
        model_number: non_empty(child_text(&root, &selectors.model_number)),
        rating: non_empty(child_text(&root, &selectors.rating)),
        is_best_seller: !child_text(&root, &selectors.best_seller).is_empty(),
    })
}

/// Visits detail pages and feeds the item channel
pub struct DetailFetcher<F> {
    crawler: Arc<Crawler<F>>,
    selectors: Arc<DetailSelectors>,
    items: UnboundedSender<RawProduct>,
}

impl<F: Fetch> DetailFetcher<F> {
    pub fn new(
        crawler: Arc<Crawler<F>>,
        selectors: Arc<DetailSelectors>,
        items: UnboundedSender<RawProduct>,
    ) -> Self {
        Self {
            crawler,
            selectors,
            items,
        }
    }

    /// Fetches `url` and emits its product
    pub async fn visit(&self, url: Url) -> VisitOutcome {
        let body = match self.crawler.visit(&url).await {
            Ok(body) => body,
            Err(e) => return VisitOutcome::Failed(e),
        };

        let Some(raw) = extract_raw_product(&body, &url, &self.selectors) else {
            tracing::debug!("No product found on {}", url);
            return VisitOutcome::Skipped {
                url: url.to_string(),
            };
        };

        tracing::trace!("Emitting product from {}", url);
        if self.items.send(raw).is_err() {
            tracing::error!("Item channel closed before {} was delivered", url);
            return VisitOutcome::Undelivered {
                url: url.to_string(),
            };
        }

        VisitOutcome::Emitted
    }
}
