//! A named crawler: transport, politeness rules and response cache together

use crate::crawler::cache::ResponseCache;
use crate::crawler::fetcher::Fetch;
use crate::crawler::politeness::{Politeness, RetryContext};
use crate::FetchError;
use url::Url;

/// Visits pages for one crawl graph (listing or detail)
#[derive(Debug)]
pub struct Crawler<F> {
    name: String,
    fetcher: F,
    politeness: Politeness,
    cache: Option<ResponseCache>,
}

impl<F: Fetch> Crawler<F> {
    pub fn new(name: impl Into<String>, fetcher: F, politeness: Politeness) -> Self {
        Self {
            name: name.into(),
            fetcher,
            politeness,
            cache: None,
        }
    }

    /// Serves repeat visits from `cache` instead of the network
    pub fn with_cache(mut self, cache: ResponseCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the body of `url`
    ///
    /// Cached bodies are returned straight away. Otherwise the page is fetched under
    /// the politeness rules with a fresh retry context and, on success, cached.
    pub async fn visit(&self, url: &Url) -> Result<String, FetchError> {
        if let Some(cache) = &self.cache {
            if let Some(body) = cache.load(url).await {
                tracing::trace!("[{}] cache hit for {}", self.name, url);
                return Ok(body);
            }
        }

        let mut ctx = RetryContext::new();
        let body = self.politeness.fetch(&self.fetcher, url, &mut ctx).await?;
        if ctx.attempts() > 0 {
            tracing::debug!(
                "[{}] {} succeeded after {} retries",
                self.name,
                url,
                ctx.attempts()
            );
        }

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.store(url, &body).await {
                tracing::warn!("[{}] failed to cache {}: {}", self.name, url, e);
            }
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PolitenessConfig;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tempfile::TempDir;

    #[derive(Default)]
    struct CountingFetcher {
        calls: AtomicU32,
    }

    impl Fetch for CountingFetcher {
        async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("body of {}", url.path()))
        }
    }

    fn politeness() -> Politeness {
        Politeness::new(
            "*",
            &PolitenessConfig {
                parallelism: 1,
                delay_ms: 0,
                random_delay_ms: 0,
                max_retries: 0,
                retry_backoff_ms: 0,
                request_timeout_secs: 5,
            },
        )
    }

    #[tokio::test]
    async fn test_visit_without_cache_always_fetches() {
        let crawler = Crawler::new("noon", CountingFetcher::default(), politeness());
        let url = Url::parse("https://www.noon.com/p/1").unwrap();

        crawler.visit(&url).await.unwrap();
        crawler.visit(&url).await.unwrap();

        assert_eq!(crawler.fetcher.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_visit_served_from_cache() {
        let dir = TempDir::new().unwrap();
        let crawler = Crawler::new("noon", CountingFetcher::default(), politeness())
            .with_cache(ResponseCache::new(dir.path(), "noon"));
        let url = Url::parse("https://www.noon.com/p/1").unwrap();

        let first = crawler.visit(&url).await.unwrap();
        let second = crawler.visit(&url).await.unwrap();

        assert_eq!(first, "body of /p/1");
        assert_eq!(first, second);
        assert_eq!(crawler.fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(crawler.name(), "noon");
    }
}
