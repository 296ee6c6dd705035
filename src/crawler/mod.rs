//! Crawler module for listing and detail page fetching
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `Fetch` trait
//! - Politeness rules: per-host concurrency, delay with jitter, bounded retries
//! - The on-disk response cache
//! - Listing walks and detail visits
//! - Dispatch tracking and overall run coordination

mod cache;
mod coordinator;
mod detail;
mod dispatch;
mod fetcher;
mod listing;
mod politeness;
mod selectors;
mod site_crawler;

pub use cache::ResponseCache;
pub use coordinator::{listing_plan, run_scrape, Coordinator};
pub use detail::{extract_raw_product, DetailFetcher, VisitOutcome};
pub use dispatch::{DispatchGroup, InFlightCounter, InFlightGuard};
pub use fetcher::{build_http_client, Fetch, HttpFetcher};
pub use listing::{extract_item_links, ListWalker, PageOutcome};
pub use politeness::{Politeness, RetryContext};
pub use selectors::{DetailSelectors, ListingSelectors};
pub use site_crawler::Crawler;
