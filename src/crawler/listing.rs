//! Listing page walker
//!
//! Walks listing pages 1..=N in order. Every product link found is handed to the
//! dispatch callback straight away, so detail visits run while later listing pages
//! are still being requested.

use crate::crawler::fetcher::Fetch;
use crate::crawler::selectors::ListingSelectors;
use crate::crawler::site_crawler::Crawler;
use crate::url::{listing_page_url, resolve_link};
use scraper::Html;
use std::sync::Arc;
use url::Url;

/// What happened to one listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// The page loaded and `links` product links were dispatched
    Walked { page: u32, links: usize },
    /// The page could not be loaded; remaining pages are still walked
    Failed { page: u32 },
}

/// Extracts the product links of a listing page, resolved against the site root
pub fn extract_item_links(html: &str, selectors: &ListingSelectors, root: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);

    document
        .select(&selectors.item)
        .filter_map(|item| item.select(&selectors.link).next())
        .filter_map(|link| link.value().attr("href"))
        .filter_map(|href| resolve_link(href, root))
        .collect()
}

/// Sequential walker over a bounded number of listing pages
pub struct ListWalker<F> {
    crawler: Arc<Crawler<F>>,
    selectors: ListingSelectors,
    root: Url,
    base: Url,
    page_param: String,
    pages: u32,
}

impl<F: Fetch> ListWalker<F> {
    pub fn new(
        crawler: Arc<Crawler<F>>,
        selectors: ListingSelectors,
        root: Url,
        base: Url,
        page_param: impl Into<String>,
        pages: u32,
    ) -> Self {
        Self {
            crawler,
            selectors,
            root,
            base,
            page_param: page_param.into(),
            pages,
        }
    }

    /// URLs of every listing page this walker will request
    pub fn page_urls(&self) -> Vec<Url> {
        (1..=self.pages)
            .map(|page| listing_page_url(&self.base, &self.page_param, page))
            .collect()
    }

    /// Visits each listing page and passes every product link to `dispatch`
    ///
    /// `dispatch` must not wait on the visit it launches.
    pub async fn walk<D>(&self, mut dispatch: D) -> Vec<PageOutcome>
    where
        D: FnMut(Url),
    {
        let mut outcomes = Vec::with_capacity(self.pages as usize);

        for (page, url) in (1..=self.pages).zip(self.page_urls()) {
            match self.crawler.visit(&url).await {
                Ok(body) => {
                    let links = extract_item_links(&body, &self.selectors, &self.root);
                    tracing::info!("Listing page {}: {} products", page, links.len());

                    let count = links.len();
                    for link in links {
                        dispatch(link);
                    }
                    outcomes.push(PageOutcome::Walked { page, links: count });
                }
                Err(e) => {
                    tracing::error!(
                        "[{}] Failed to visit product list page {}: {}",
                        self.crawler.name(),
                        page,
                        e
                    );
                    outcomes.push(PageOutcome::Failed { page });
                }
            }
        }

        outcomes
    }
}
