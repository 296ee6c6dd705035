//! Crawler coordinator - main scrape orchestration logic
//!
//! A run wires the pieces together in this order:
//! - start the pipeline on the receiving end of the item channel
//! - walk the listing pages, dispatching one detail visit per product link
//! - wait for the listing walk and for every dispatched visit to finish
//! - drop the last sender so the pipeline drains, then collect its report
//!
//! The item channel is only closed once the in-flight count is back to zero.

use crate::config::Config;
use crate::crawler::cache::ResponseCache;
use crate::crawler::detail::{DetailFetcher, VisitOutcome};
use crate::crawler::dispatch::DispatchGroup;
use crate::crawler::fetcher::{build_http_client, Fetch, HttpFetcher};
use crate::crawler::listing::ListWalker;
use crate::crawler::politeness::Politeness;
use crate::crawler::selectors::{DetailSelectors, ListingSelectors};
use crate::crawler::site_crawler::Crawler;
use crate::extract::PriceParser;
use crate::output::{CsvSink, RunSummary};
use crate::pipeline::{NotabilityFilter, Pipeline, ProductTyper, RankCounter};
use crate::url::{listing_base_url, listing_page_url};
use crate::{ConfigError, ScrapeError};
use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use url::Url;

/// Main scrape coordinator structure
pub struct Coordinator<F: Fetch = HttpFetcher, W: Write = File> {
    config: Arc<Config>,
    root: Url,
    base: Url,
    listing: Arc<Crawler<F>>,
    detail: Arc<Crawler<F>>,
    listing_selectors: ListingSelectors,
    detail_selectors: Arc<DetailSelectors>,
    pipeline: Pipeline,
    sink: CsvSink<W>,
}

impl Coordinator<HttpFetcher> {
    /// Creates a coordinator that fetches over HTTP
    ///
    /// # Arguments
    ///
    /// * `config` - The scraper configuration
    /// * `use_cache` - Whether to serve and store pages through the response cache
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(ScrapeError)` - Setup failed (HTTP client, selectors or output file)
    pub fn new(config: Config, use_cache: bool) -> Result<Self, ScrapeError> {
        let client = build_http_client(
            &config.http.user_agent,
            Duration::from_secs(config.politeness.request_timeout_secs),
        )?;
        Self::with_fetcher(config, HttpFetcher::new(client), use_cache)
    }
}

impl<F: Fetch + Clone> Coordinator<F, File> {
    /// Creates a coordinator around any transport
    ///
    /// The listing and detail crawlers each get their own copy of `fetcher` and their
    /// own politeness state.
    pub fn with_fetcher(config: Config, fetcher: F, use_cache: bool) -> Result<Self, ScrapeError> {
        let root = Url::parse(&config.site.root)?;
        let base = listing_base_url(&config.site.root, &config.site.listing_path)?;

        let prices = PriceParser::new(&config.site.currency).map_err(|e| {
            ConfigError::Validation(format!(
                "Cannot build price pattern for '{}': {}",
                config.site.currency, e
            ))
        })?;
        let pipeline = Pipeline::new(
            NotabilityFilter::new(config.filter.min_rating_count),
            ProductTyper::new(&config.site.name, prices, RankCounter::new()),
        );

        let csv_path = Path::new(&config.output.csv_path);
        let sink = CsvSink::open(csv_path).map_err(|e| {
            tracing::error!("Failed to open {}: {}", csv_path.display(), e);
            e
        })?;

        let cache = match (&config.http.cache_dir, use_cache) {
            (Some(dir), true) => {
                let cache = ResponseCache::new(dir, &config.site.name);
                tracing::info!("Using response cache at {}", cache.dir().display());
                Some(cache)
            }
            _ => None,
        };

        let host_pattern = config.site.host_pattern();
        let build = |role: &str, fetcher: F| {
            let crawler = Crawler::new(
                format!("{}-{}", config.site.name, role),
                fetcher,
                Politeness::new(host_pattern.clone(), &config.politeness),
            );
            match &cache {
                Some(cache) => Arc::new(crawler.with_cache(cache.clone())),
                None => Arc::new(crawler),
            }
        };

        let listing = build("listing", fetcher.clone());
        let detail = build("detail", fetcher);

        Ok(Self {
            root,
            base,
            listing,
            detail,
            listing_selectors: ListingSelectors::new()?,
            detail_selectors: Arc::new(DetailSelectors::new()?),
            pipeline,
            sink,
            config: Arc::new(config),
        })
    }
}

impl<F: Fetch, W: Write + Send + 'static> Coordinator<F, W> {
    /// Sends rows to `sink` instead of the configured CSV file
    pub fn with_sink<S: Write + Send + 'static>(self, sink: CsvSink<S>) -> Coordinator<F, S> {
        Coordinator {
            config: self.config,
            root: self.root,
            base: self.base,
            listing: self.listing,
            detail: self.detail,
            listing_selectors: self.listing_selectors,
            detail_selectors: self.detail_selectors,
            pipeline: self.pipeline,
            sink,
        }
    }

    /// Runs the scrape to completion
    ///
    /// Transient fetch failures and extraction failures are logged and counted. A
    /// pipeline failure (a sink that cannot be written) aborts the crawl at once:
    /// the listing walk stops and every visit still in flight is cancelled.
    pub async fn run(self) -> Result<RunSummary, ScrapeError> {
        let mut summary = RunSummary::started();
        tracing::info!(
            "Starting scrape of {} ({} listing pages)",
            self.config.site.name,
            self.config.site.pages
        );

        let (items_tx, items_rx) = mpsc::unbounded_channel();
        let mut pipeline = self.pipeline.spawn(items_rx, self.sink);

        let details = Arc::new(DetailFetcher::new(
            self.detail,
            self.detail_selectors,
            items_tx,
        ));
        let walker = ListWalker::new(
            self.listing,
            self.listing_selectors,
            self.root,
            self.base,
            self.config.site.page_param.as_str(),
            self.config.site.pages,
        );

        // Owns the dispatch group: dropping this future aborts every visit in it
        let crawl = async {
            let mut visits = DispatchGroup::new();
            let mut seen = HashSet::new();
            let mut dispatched = 0;
            let mut repeats = 0;

            let pages = walker
                .walk(|url| {
                    if !seen.insert(url.clone()) {
                        tracing::debug!("Skipping repeated product link {}", url);
                        repeats += 1;
                        return;
                    }
                    dispatched += 1;
                    let details = Arc::clone(&details);
                    visits.spawn(async move { details.visit(url).await });
                })
                .await;
            tracing::info!(
                "Listing walk finished, waiting for {} detail visits",
                visits.in_flight().current()
            );

            let outcomes = visits.join_all().await;
            (pages, outcomes, dispatched, repeats)
        };

        let (pages, outcomes, dispatched, repeats) = tokio::select! {
            crawled = crawl => crawled,
            stopped = &mut pipeline => {
                // The item channel is still open, so the pipeline only ends early on failure
                let error = match stopped {
                    Ok(Ok(_)) => ScrapeError::ChannelClosed,
                    Ok(Err(e)) => e,
                    Err(e) => e.into(),
                };
                tracing::error!("Pipeline stopped during the crawl, aborting: {}", error);
                return Err(error);
            }
        };

        for page in &pages {
            summary.record_page(page);
        }
        summary.visits_dispatched = dispatched;
        summary.visits_skipped += repeats;

        let mut undelivered = 0;
        for outcome in &outcomes {
            if matches!(outcome, VisitOutcome::Undelivered { .. }) {
                undelivered += 1;
            }
            summary.record_visit(outcome);
        }

        // Last sender: dropping it closes the item channel
        drop(details);

        let report = pipeline.await??;
        if undelivered > 0 {
            tracing::error!("{} products were emitted after the pipeline stopped", undelivered);
            return Err(ScrapeError::ChannelClosed);
        }

        summary.finish(&report);
        tracing::info!(
            "Scrape finished: {} pages walked, {} visits, {} rows written",
            summary.pages_walked,
            summary.visits_dispatched,
            summary.rows_written
        );

        Ok(summary)
    }
}

/// Listing page URLs a run would request, in order
pub fn listing_plan(config: &Config) -> Result<Vec<Url>, ScrapeError> {
    let base = listing_base_url(&config.site.root, &config.site.listing_path)?;
    Ok((1..=config.site.pages)
        .map(|page| listing_page_url(&base, &config.site.page_param, page))
        .collect())
}

/// Runs a complete scrape with the HTTP transport
pub async fn run_scrape(config: Config, use_cache: bool) -> Result<RunSummary, ScrapeError> {
    Coordinator::new(config, use_cache)?.run().await
}
