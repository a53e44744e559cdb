//! Fetch Statistics Module
//!
//! Tracks how intercepted requests were answered.

use serde::Serialize;

// == Fetch Stats ==
/// Counters for the fetch path.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FetchStats {
    /// Requests answered from a cache bucket
    pub hits: u64,
    /// Requests that fell back to the network
    pub misses: u64,
    /// Requests passed through while the worker was not in control
    pub bypasses: u64,
    /// Network fetches that failed
    pub network_errors: u64,
}

impl FetchStats {
    // == Constructor ==
    /// Creates a new FetchStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate over controlled requests.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_bypass(&mut self) {
        self.bypasses += 1;
    }

    pub fn record_network_error(&mut self) {
        self.network_errors += 1;
    }
}
