//! Lifecycle Task
//!
//! Drives a freshly started worker through install and activate, the way a
//! browser does after registering a service worker.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::error::{Result, WorkerError};
use crate::models::ActivateReport;
use crate::worker::ServiceWorker;

/// Installs the worker, retrying failed installs, then activates it.
///
/// # Arguments
/// * `worker` - The worker to bring into control
/// * `retries` - Extra install attempts after the first failure
/// * `retry_delay` - Pause between install attempts
///
/// When an install or activate started elsewhere is still in flight, waits
/// for it to settle and carries on from the state it left.
pub async fn run_lifecycle(
    worker: Arc<ServiceWorker>,
    retries: u32,
    retry_delay: Duration,
) -> Result<ActivateReport> {
    let attempts = retries.saturating_add(1);
    let mut attempt = 1;

    loop {
        match worker.dispatch_install().await {
            Ok(_) => break,
            Err(WorkerError::InvalidState(reason)) => {
                info!("Install deferred: {}", reason);
                if worker.wait_settled().await.can_activate() {
                    break;
                }
            }
            Err(e) if attempt < attempts => {
                warn!(
                    "Install attempt {}/{} failed: {}; retrying in {:?}",
                    attempt, attempts, e, retry_delay
                );
                attempt += 1;
                tokio::time::sleep(retry_delay).await;
            }
            Err(e) => return Err(e),
        }
    }

    loop {
        match worker.dispatch_activate().await {
            Err(WorkerError::InvalidState(reason)) => {
                if !worker.wait_settled().await.can_activate() {
                    return Err(WorkerError::InvalidState(reason));
                }
                info!("Activate deferred: {}", reason);
            }
            outcome => return outcome,
        }
    }
}

/// Spawns the lifecycle as a background task.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let worker = Arc::new(ServiceWorker::from_config(&config)?);
/// let lifecycle_handle = spawn_lifecycle(worker.clone(), 3, Duration::from_secs(1));
/// // Later, during shutdown:
/// lifecycle_handle.abort();
/// ```
pub fn spawn_lifecycle(
    worker: Arc<ServiceWorker>,
    retries: u32,
    retry_delay: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Starting worker lifecycle for cache '{}' ({} install retries)",
            worker.cache_name(),
            retries
        );

        match run_lifecycle(worker, retries, retry_delay).await {
            Ok(report) => info!(
                "Worker in control of cache '{}', purged {:?}",
                report.cache_name, report.deleted
            ),
            Err(e) => error!("Worker lifecycle stopped: {}; requests pass through to the network", e),
        }
    })
}
