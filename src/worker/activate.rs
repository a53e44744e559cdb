//! Activate Handler
//!
//! Deletes every cache bucket left behind by a previous version.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use tracing::{error, info, warn};

use super::{EventKind, ExtendableEvent, ServiceWorker, WorkerState};
use crate::error::{Result, WorkerError};
use crate::models::ActivateReport;

impl ServiceWorker {
    /// Dispatches the activate event and waits for it to settle.
    ///
    /// A settled activation puts the worker in control of fetches. Dropping
    /// the returned future does not cancel the activation.
    pub async fn dispatch_activate(self: &Arc<Self>) -> Result<ActivateReport> {
        self.run_detached(EventKind::Activate, Self::activate_event).await
    }

    async fn activate_event(self: Arc<Self>) -> Result<ActivateReport> {
        let previous = self.begin(EventKind::Activate).await?;
        info!("Activating worker for cache '{}'", self.cache_name);

        let mut event = ExtendableEvent::new(EventKind::Activate);
        let worker = Arc::clone(&self);
        event.wait_until(async move { Ok(worker.purge_stale_caches().await) });

        let outcome = event.settle().await.and_then(|reports| {
            reports
                .into_iter()
                .next()
                .ok_or_else(|| WorkerError::Internal("activate produced no report".to_string()))
        });

        match outcome {
            Ok(report) => {
                self.controlling.store(true, Ordering::Release);
                self.set_state(WorkerState::Activated).await;
                info!(
                    "Activated: deleted {} stale cache(s), {} failed",
                    report.deleted.len(),
                    report.failed.len()
                );
                Ok(report)
            }
            Err(e) => {
                self.set_state(previous).await;
                error!("Activate failed: {}", e);
                Err(e)
            }
        }
    }

    /// Deletes every bucket whose name differs from the current cache name.
    ///
    /// Best-effort: a failed delete is logged and reported, and the remaining
    /// buckets are still processed. The bucket is gone from lookups even when
    /// its snapshot could not be removed from disk.
    pub async fn purge_stale_caches(&self) -> ActivateReport {
        let mut storage = self.storage.write().await;
        let mut report = ActivateReport::new(self.cache_name.clone());

        for name in storage.keys() {
            if name == self.cache_name {
                continue;
            }

            info!("Deleting stale cache '{}'", name);
            match storage.delete(&name) {
                Ok(_) => report.deleted.push(name),
                Err(e) => {
                    warn!("Failed to delete stale cache '{}': {}", name, e);
                    report.failed.push(name);
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use tempfile::TempDir;

    use crate::cache::{CacheStorage, DiskStore, RequestKey};
    use crate::network::mock::MockNetwork;
    use crate::network::{FetchRequest, FetchResponse};

    fn worker_on(cache_name: &str, storage: CacheStorage) -> Arc<ServiceWorker> {
        Arc::new(ServiceWorker::new(
            cache_name,
            vec!["/".to_string()],
            storage,
            Arc::new(MockNetwork::new().with_page("/", "home")),
        ))
    }

    fn seeded(names: &[&str]) -> CacheStorage {
        let mut storage = CacheStorage::in_memory();
        for name in names {
            storage
                .put_all(
                    name,
                    vec![(RequestKey::new("/"), FetchResponse::new(200, "/", name.to_string()))],
                )
                .unwrap();
        }
        storage
    }

    #[tokio::test]
    async fn test_activate_deletes_previous_version() {
        let worker = worker_on("v2", seeded(&["v1"]));
        worker.dispatch_install().await.unwrap();

        let report = worker.dispatch_activate().await.unwrap();

        assert_eq!(report.deleted, vec!["v1"]);
        assert!(report.failed.is_empty());
        assert_eq!(worker.state().await, WorkerState::Activated);
        assert!(worker.is_controlling());

        let storage = worker.storage();
        let storage = storage.read().await;
        assert_eq!(storage.keys(), vec!["v2"]);
        let (bucket, entry) = storage.match_request(&FetchRequest::get("/")).unwrap();
        assert_eq!(bucket, "v2");
        assert_eq!(entry.response.body, "home");
    }

    #[tokio::test]
    async fn test_activate_leaves_only_current_bucket() {
        let worker = worker_on("v3", seeded(&["v1", "other-app", "v2"]));
        worker.dispatch_install().await.unwrap();

        let report = worker.dispatch_activate().await.unwrap();

        assert_eq!(report.deleted, vec!["v1", "other-app", "v2"]);
        let storage = worker.storage();
        assert_eq!(storage.read().await.keys(), vec!["v3"]);
    }

    #[tokio::test]
    async fn test_activate_keeps_current_bucket_untouched() {
        let worker = worker_on("v2", seeded(&["v1", "v2"]));
        let before = {
            let storage = worker.storage();
            let storage = storage.read().await;
            storage.bucket("v2").unwrap().get(&RequestKey::new("/")).cloned()
        };

        worker.purge_stale_caches().await;

        let storage = worker.storage();
        let storage = storage.read().await;
        assert_eq!(storage.bucket("v2").unwrap().get(&RequestKey::new("/")).cloned(), before);
    }

    #[tokio::test]
    async fn test_activate_requires_install() {
        let worker = worker_on("v1", CacheStorage::in_memory());

        let result = worker.dispatch_activate().await;

        assert!(matches!(result, Err(WorkerError::InvalidState(_))));
        assert!(!worker.is_controlling());
    }

    #[tokio::test]
    async fn test_activate_twice_is_harmless() {
        let worker = worker_on("v1", seeded(&["v0"]));
        worker.dispatch_install().await.unwrap();
        worker.dispatch_activate().await.unwrap();

        let report = worker.dispatch_activate().await.unwrap();

        assert!(report.deleted.is_empty());
        assert_eq!(worker.state().await, WorkerState::Activated);
    }

    #[tokio::test]
    async fn test_activate_is_best_effort_on_disk_failure() {
        let temp_dir = TempDir::new().unwrap();
        let mut storage = CacheStorage::persistent(temp_dir.path()).unwrap();
        storage.open("v1").unwrap();

        // A non-empty directory in place of the snapshot cannot be unlinked
        let snapshot = DiskStore::open(temp_dir.path()).unwrap().bucket_path("v1");
        std::fs::remove_file(&snapshot).unwrap();
        std::fs::create_dir(&snapshot).unwrap();
        std::fs::write(snapshot.join("pinned"), "x").unwrap();

        let worker = worker_on("v2", storage);
        worker.dispatch_install().await.unwrap();
        let report = worker.dispatch_activate().await.unwrap();

        assert!(report.deleted.is_empty());
        assert_eq!(report.failed, vec!["v1"]);
        assert_eq!(worker.state().await, WorkerState::Activated);
        assert!(worker.is_controlling());
        let storage = worker.storage();
        assert_eq!(storage.read().await.keys(), vec!["v2"]);
    }

    #[tokio::test]
    async fn test_dropped_dispatch_still_finishes_activate() {
        let worker = worker_on("v2", seeded(&["v1"]));
        worker.dispatch_install().await.unwrap();

        let storage = worker.storage();
        let held = storage.write().await;
        let dropped =
            tokio::time::timeout(Duration::from_millis(10), worker.dispatch_activate()).await;
        assert!(dropped.is_err());
        assert_eq!(worker.state().await, WorkerState::Activating);
        drop(held);

        assert_eq!(worker.wait_settled().await, WorkerState::Activated);
        assert!(worker.is_controlling());
        assert_eq!(storage.read().await.keys(), vec!["v2"]);
    }
}
