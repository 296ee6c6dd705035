//! Fan-out of detail visits and completion tracking
//!
//! `DispatchGroup` ties spawning a visit to counting it: the in-flight guard is taken
//! before the task exists and released when the task's future is dropped, whether it
//! finished, bailed out early or panicked. The coordinator closes the item channel
//! only after `join_all` has seen the count return to zero.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::task::JoinSet;

#[derive(Debug, Default)]
struct CounterInner {
    count: AtomicUsize,
    idle: Notify,
}

/// Number of visits dispatched but not yet completed
#[derive(Debug, Clone, Default)]
pub struct InFlightCounter {
    inner: Arc<CounterInner>,
}

impl InFlightCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new in-flight visit; the returned guard releases it on drop
    pub fn acquire(&self) -> InFlightGuard {
        self.inner.count.fetch_add(1, Ordering::SeqCst);
        InFlightGuard {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Current number of in-flight visits
    pub fn current(&self) -> usize {
        self.inner.count.load(Ordering::SeqCst)
    }

    /// Waits until no visit is in flight
    pub async fn wait_idle(&self) {
        loop {
            // Register before checking so a release in between is not missed
            let notified = self.inner.idle.notified();
            if self.current() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// Releases one in-flight slot exactly once, on drop
#[derive(Debug)]
pub struct InFlightGuard {
    inner: Arc<CounterInner>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if self.inner.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.inner.idle.notify_waiters();
        }
    }
}

/// A structured group of concurrently running visits
pub struct DispatchGroup<T> {
    tasks: JoinSet<T>,
    in_flight: InFlightCounter,
}

impl<T: Send + 'static> DispatchGroup<T> {
    pub fn new() -> Self {
        Self {
            tasks: JoinSet::new(),
            in_flight: InFlightCounter::new(),
        }
    }

    /// Launches `visit` without waiting for it
    ///
    /// The visit is counted before it is spawned, so the count can never read zero
    /// while a dispatched visit has yet to start.
    pub fn spawn<Fut>(&mut self, visit: Fut)
    where
        Fut: Future<Output = T> + Send + 'static,
    {
        let guard = self.in_flight.acquire();
        self.tasks.spawn(async move {
            let _guard = guard;
            visit.await
        });
    }

    /// The group's in-flight counter
    pub fn in_flight(&self) -> &InFlightCounter {
        &self.in_flight
    }

    /// Waits for every visit and returns their outcomes in completion order
    ///
    /// Panicked visits are logged and left out of the result; their guards have
    /// already been released by unwinding.
    pub async fn join_all(mut self) -> Vec<T> {
        let mut outcomes = Vec::with_capacity(self.tasks.len());

        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => tracing::error!("Detail visit task failed: {}", e),
            }
        }

        self.in_flight.wait_idle().await;
        outcomes
    }
}

impl<T: Send + 'static> Default for DispatchGroup<T> {
    fn default() -> Self {
        Self::new()
    }
}
