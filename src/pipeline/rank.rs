use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Hands out 1-based ranks in the order products are typed
///
/// Owned by the typing stage. Clones share the same sequence, so a caller holding a
/// clone can read how many ranks have been assigned.
#[derive(Debug, Clone, Default)]
pub struct RankCounter {
    assigned: Arc<AtomicU32>,
}

impl RankCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns the next rank
    pub fn next(&self) -> u32 {
        self.assigned.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Number of ranks assigned so far
    pub fn assigned(&self) -> u32 {
        self.assigned.load(Ordering::SeqCst)
    }
}
