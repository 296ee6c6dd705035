//! Politeness rules for outbound fetches
//!
//! For hosts matching the configured glob this module enforces:
//! - a cap on simultaneous fetches per host (one semaphore per host)
//! - a fixed delay plus random jitter before every fetch
//! - a per-attempt wall-clock timeout
//!
//! For every host it applies the bounded retry-with-backoff contract: failed attempts
//! are retried up to `max_retries` times, then the fetch is abandoned and logged.

use crate::config::PolitenessConfig;
use crate::crawler::fetcher::Fetch;
use crate::url::{extract_domain, matches_glob};
use crate::FetchError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use url::Url;

/// Attempt bookkeeping for one visit
///
/// Created at zero when a visit starts and dropped when the visit succeeds or gives up.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RetryContext {
    attempts: u32,
}

impl RetryContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retries issued so far
    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

/// Rate limiter and retry policy shared by all visits of one crawler
#[derive(Debug)]
pub struct Politeness {
    host_pattern: String,
    parallelism: usize,
    delay: Duration,
    random_delay: Duration,
    max_retries: u32,
    retry_backoff: Duration,
    timeout: Duration,

    /// Per-host concurrency slots, created on first use
    slots: Mutex<HashMap<String, Arc<Semaphore>>>,
}

impl Politeness {
    /// Creates the politeness rules for hosts matching `host_pattern`
    pub fn new(host_pattern: impl Into<String>, config: &PolitenessConfig) -> Self {
        Self {
            host_pattern: host_pattern.into(),
            parallelism: config.parallelism.max(1) as usize,
            delay: Duration::from_millis(config.delay_ms),
            random_delay: Duration::from_millis(config.random_delay_ms),
            max_retries: config.max_retries,
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
            timeout: Duration::from_secs(config.request_timeout_secs),
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Fetches `url`, retrying failed attempts with a fixed backoff
    ///
    /// Each failure checks the attempt count in `ctx`: below the bound it is bumped,
    /// the backoff is slept and the request re-issued; at the bound the fetch is
    /// abandoned with `FetchError::Exhausted`. Abandonment is logged here, callers
    /// only need to drop the visit.
    pub async fn fetch<F: Fetch>(
        &self,
        fetcher: &F,
        url: &Url,
        ctx: &mut RetryContext,
    ) -> Result<String, FetchError> {
        loop {
            match self.attempt(fetcher, url).await {
                Ok(body) => return Ok(body),
                Err(error) if ctx.attempts < self.max_retries => {
                    ctx.attempts += 1;
                    tracing::warn!("Retry {} for {}: {}", ctx.attempts, url, error);
                    tokio::time::sleep(self.retry_backoff).await;
                }
                Err(error) => {
                    tracing::error!(
                        "Failed to visit {} after {} retries: {}",
                        url,
                        ctx.attempts,
                        error
                    );
                    return Err(FetchError::Exhausted {
                        url: url.to_string(),
                        attempts: ctx.attempts,
                        last: Box::new(error),
                    });
                }
            }
        }
    }

    /// One attempt: take a host slot, wait out the delay, fetch under the timeout
    async fn attempt<F: Fetch>(&self, fetcher: &F, url: &Url) -> Result<String, FetchError> {
        // Held until the attempt finishes; released before any retry backoff
        let _permit = match self.slot_for(url) {
            Some(slot) => {
                let permit = acquire(slot).await;
                tokio::time::sleep(self.pause()).await;
                permit
            }
            None => None,
        };

        tracing::debug!("Fetching {}", url);

        match tokio::time::timeout(self.timeout, fetcher.fetch(url)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout {
                url: url.to_string(),
            }),
        }
    }

    /// Returns the host's semaphore, or None for hosts outside the pattern
    fn slot_for(&self, url: &Url) -> Option<Arc<Semaphore>> {
        let host = extract_domain(url)?;
        if !matches_glob(&self.host_pattern, &host) {
            return None;
        }

        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        Some(Arc::clone(
            slots
                .entry(host)
                .or_insert_with(|| Arc::new(Semaphore::new(self.parallelism))),
        ))
    }

    /// Fixed delay plus uniform jitter in `[0, random_delay]`
    fn pause(&self) -> Duration {
        let jitter_ms = self.random_delay.as_millis() as u64;
        if jitter_ms == 0 {
            self.delay
        } else {
            self.delay + Duration::from_millis(fastrand::u64(0..=jitter_ms))
        }
    }
}

async fn acquire(slot: Arc<Semaphore>) -> Option<OwnedSemaphorePermit> {
    // Slots are never closed, so this only fails if that changes
    slot.acquire_owned().await.ok()
}
