//! Install Handler
//!
//! Populates the current cache bucket with every pre-cache URL.

use std::sync::Arc;

use tracing::{error, info};

use super::{EventKind, ExtendableEvent, ServiceWorker, WorkerState};
use crate::error::{Result, WorkerError};
use crate::models::InstallReport;
use crate::network::FetchRequest;

impl ServiceWorker {
    /// Dispatches the install event and waits for it to settle.
    ///
    /// On failure the worker becomes redundant, unless it already controls
    /// fetches, in which case it keeps control with its previous cache.
    /// Dropping the returned future does not cancel the install.
    pub async fn dispatch_install(self: &Arc<Self>) -> Result<InstallReport> {
        self.run_detached(EventKind::Install, Self::install_event).await
    }

    async fn install_event(self: Arc<Self>) -> Result<InstallReport> {
        self.begin(EventKind::Install).await?;
        info!("Installing worker for cache '{}'", self.cache_name);

        let mut event = ExtendableEvent::new(EventKind::Install);
        let worker = Arc::clone(&self);
        event.wait_until(async move { worker.precache().await });

        let outcome = event.settle().await.and_then(|reports| {
            reports
                .into_iter()
                .next()
                .ok_or_else(|| WorkerError::Internal("install produced no report".to_string()))
        });

        match outcome {
            Ok(report) => {
                self.set_state(WorkerState::Installed).await;
                info!(
                    "Installed: cached {} URL(s) in '{}'",
                    report.cached.len(),
                    report.cache_name
                );
                Ok(report)
            }
            Err(e) => {
                let fallback = if self.is_controlling() {
                    WorkerState::Activated
                } else {
                    WorkerState::Redundant
                };
                self.set_state(fallback).await;
                error!("Install failed: {}", e);
                Err(e)
            }
        }
    }

    /// Opens the current bucket and stores a response for every pre-cache URL.
    ///
    /// All URLs are fetched before anything is written. A transport failure or
    /// a non-2xx status aborts the batch and leaves the bucket unchanged.
    pub async fn precache(&self) -> Result<InstallReport> {
        self.storage.write().await.open(&self.cache_name)?;
        info!("Cache '{}' opened", self.cache_name);

        let mut entries = Vec::with_capacity(self.precache_urls.len());
        for url in &self.precache_urls {
            let request = FetchRequest::get(url.clone());
            let response = self
                .network
                .fetch(&request)
                .await
                .map_err(|e| WorkerError::InstallFailed(format!("{}: {}", url, e)))?;

            if !response.is_ok() {
                return Err(WorkerError::InstallFailed(format!(
                    "{} responded with status {}",
                    url, response.status
                )));
            }
            entries.push((request.key(), response));
        }

        let cached = entries.iter().map(|(key, _)| key.to_string()).collect();
        self.storage
            .write()
            .await
            .put_all(&self.cache_name, entries)?;

        Ok(InstallReport {
            cache_name: self.cache_name.clone(),
            cached,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStorage;
    use crate::network::mock::MockNetwork;
    use crate::network::FetchResponse;
    use std::time::Duration;

    fn site() -> MockNetwork {
        MockNetwork::new()
            .with_page("/", "<html>home</html>")
            .with_page("/manifest.json", r#"{"name":"subs"}"#)
    }

    fn worker_with(network: MockNetwork) -> (Arc<ServiceWorker>, Arc<MockNetwork>) {
        let network = Arc::new(network);
        let worker = Arc::new(ServiceWorker::new(
            "youtube-subtitle-v1",
            vec!["/".to_string(), "/manifest.json".to_string()],
            CacheStorage::in_memory(),
            network.clone(),
        ));
        (worker, network)
    }

    #[tokio::test]
    async fn test_install_caches_every_url() {
        let (worker, network) = worker_with(site());

        let report = worker.dispatch_install().await.unwrap();

        assert_eq!(report.cache_name, "youtube-subtitle-v1");
        assert_eq!(report.cached, vec!["/", "/manifest.json"]);
        assert_eq!(network.calls(), vec!["/", "/manifest.json"]);
        assert_eq!(worker.state().await, WorkerState::Installed);

        let storage = worker.storage();
        let storage = storage.read().await;
        for url in ["/", "/manifest.json"] {
            assert!(storage.match_request(&FetchRequest::get(url)).is_some());
        }
    }

    #[tokio::test]
    async fn test_install_twice_is_idempotent() {
        let (worker, _) = worker_with(site());

        worker.dispatch_install().await.unwrap();
        worker.dispatch_install().await.unwrap();

        let storage = worker.storage();
        let storage = storage.read().await;
        assert_eq!(storage.len(), 1);
        assert_eq!(storage.bucket("youtube-subtitle-v1").unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_install_aborts_on_network_failure() {
        let (worker, _) = worker_with(
            MockNetwork::new()
                .with_page("/", "home")
                .with_failure("/manifest.json"),
        );

        let result = worker.dispatch_install().await;

        assert!(matches!(result, Err(WorkerError::InstallFailed(_))));
        assert_eq!(worker.state().await, WorkerState::Redundant);
        let storage = worker.storage();
        let storage = storage.read().await;
        assert!(storage.bucket("youtube-subtitle-v1").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_install_rejects_error_status() {
        let (worker, _) = worker_with(
            MockNetwork::new()
                .with_page("/", "home")
                .with_response("/manifest.json", FetchResponse::new(500, "/manifest.json", "")),
        );

        let err = worker.dispatch_install().await.unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_install_can_retry_after_failure() {
        let (worker, _) = worker_with(MockNetwork::new().with_failure("/"));
        assert!(worker.dispatch_install().await.is_err());

        // A redundant worker may be installed again
        let result = worker.dispatch_install().await;
        assert!(matches!(result, Err(WorkerError::InstallFailed(_))));
        assert_eq!(worker.state().await, WorkerState::Redundant);
    }

    #[tokio::test]
    async fn test_dropped_dispatch_still_finishes_install() {
        let (worker, _) = worker_with(site().with_delay(Duration::from_millis(50)));

        let dropped =
            tokio::time::timeout(Duration::from_millis(10), worker.dispatch_install()).await;
        assert!(dropped.is_err());

        assert_eq!(worker.wait_settled().await, WorkerState::Installed);
        worker.dispatch_activate().await.unwrap();
        assert!(worker.is_controlling());
    }
}
