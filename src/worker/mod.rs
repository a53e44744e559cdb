//! Worker Module
//!
//! The offline-first worker: pre-caches on install, answers fetches
//! cache-first, and purges stale buckets on activate.
//!
//! # Lifecycle
//! - `install` - open the current bucket and store every pre-cache URL
//! - `activate` - delete every bucket whose name differs from the current one
//! - `fetch` - cache hit, or exactly one network call that is never stored

mod activate;
mod event;
mod fetch;
mod install;
mod lifecycle;

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{Notify, RwLock};

use crate::cache::{CacheStorage, FetchStats};
use crate::config::Config;
use crate::error::{Result, WorkerError};
use crate::network::{HttpNetwork, Network};

pub use event::{EventKind, ExtendableEvent};
pub use fetch::{FetchOutcome, ResponseSource};
pub use lifecycle::WorkerState;

// == Service Worker ==
/// Worker bound to one cache version and one network.
pub struct ServiceWorker {
    /// Current bucket name; every other bucket is stale
    cache_name: String,
    /// URLs stored on install, in order
    precache_urls: Vec<String>,
    storage: Arc<RwLock<CacheStorage>>,
    network: Arc<dyn Network>,
    state: RwLock<WorkerState>,
    /// Woken on every settled lifecycle step
    state_changed: Notify,
    /// Set by the first successful activation
    controlling: AtomicBool,
    stats: RwLock<FetchStats>,
}

impl ServiceWorker {
    // == Constructors ==
    pub fn new(
        cache_name: impl Into<String>,
        precache_urls: Vec<String>,
        storage: CacheStorage,
        network: Arc<dyn Network>,
    ) -> Self {
        Self {
            cache_name: cache_name.into(),
            precache_urls,
            storage: Arc::new(RwLock::new(storage)),
            network,
            state: RwLock::new(WorkerState::Parsed),
            state_changed: Notify::new(),
            controlling: AtomicBool::new(false),
            stats: RwLock::new(FetchStats::new()),
        }
    }

    /// Builds a worker from configuration, opening persistent storage when a
    /// cache directory is set.
    pub fn from_config(config: &Config) -> Result<Self> {
        let storage = match &config.cache_dir {
            Some(dir) => CacheStorage::persistent(dir)?,
            None => CacheStorage::in_memory(),
        };
        let network = Arc::new(HttpNetwork::new(config.upstream_url.clone()));

        Ok(Self::new(
            config.cache_name.clone(),
            config.precache_urls.clone(),
            storage,
            network,
        ))
    }

    // == Accessors ==
    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    pub fn precache_urls(&self) -> &[String] {
        &self.precache_urls
    }

    /// Shared handle to the cache storage.
    pub fn storage(&self) -> Arc<RwLock<CacheStorage>> {
        Arc::clone(&self.storage)
    }

    pub async fn state(&self) -> WorkerState {
        *self.state.read().await
    }

    /// Whether fetches are answered from the cache.
    /// Waits until no install or activate is in flight and returns the
    /// state it settled in.
    pub async fn wait_settled(&self) -> WorkerState {
        loop {
            let changed = self.state_changed.notified();
            let state = self.state().await;
            if !state.is_transitioning() {
                return state;
            }
            changed.await;
        }
    }

    pub fn is_controlling(&self) -> bool {
        self.controlling.load(Ordering::Acquire)
    }

    /// Snapshot of the fetch counters.
    pub async fn stats(&self) -> FetchStats {
        self.stats.read().await.clone()
    }

    // == State Transitions ==
    /// Moves into the in-flight state for `kind`, returning the state it left.
    async fn begin(&self, kind: EventKind) -> Result<WorkerState> {
        let mut state = self.state.write().await;
        let previous = *state;

        let (allowed, next) = match kind {
            EventKind::Install => (previous.can_install(), WorkerState::Installing),
            EventKind::Activate => (previous.can_activate(), WorkerState::Activating),
        };
        if !allowed {
            return Err(WorkerError::InvalidState(format!(
                "cannot {} while {}",
                kind.as_str(),
                previous
            )));
        }

        *state = next;
        Ok(previous)
    }

    /// Runs a lifecycle step on its own task. The step reaches its final
    /// state even when the caller stops waiting.
    async fn run_detached<T, F, Fut>(self: &Arc<Self>, kind: EventKind, step: F) -> Result<T>
    where
        F: FnOnce(Arc<Self>) -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        tokio::spawn(step(Arc::clone(self)))
            .await
            .map_err(|e| WorkerError::Internal(format!("{} task failed: {}", kind.as_str(), e)))?
    }

    async fn set_state(&self, next: WorkerState) {
        *self.state.write().await = next;
        self.state_changed.notify_waiters();
    }
}
