use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic tag for outstanding read requests
///
/// Only the response to the most recently issued request may be applied;
/// anything older is stale and gets dropped on arrival.
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: AtomicU64,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags a new request, superseding every earlier one
    pub fn issue(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, seq: u64) -> bool {
        seq == self.latest()
    }
}

/// What happened to a read-path response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FetchOutcome {
    /// The response was current and now populates its list
    Applied { seq: u64, count: usize },
    /// A later request was issued first; the response was discarded
    Superseded { seq: u64 },
}

impl FetchOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, FetchOutcome::Applied { .. })
    }
}
