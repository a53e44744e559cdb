//! Extendable Events
//!
//! A lifecycle event stays open until every piece of work registered with
//! `wait_until` has settled.

use std::future::Future;

use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::error::{Result, WorkerError};

/// Lifecycle event kinds whose lifetime can be extended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Install,
    Activate,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Install => "install",
            EventKind::Activate => "activate",
        }
    }
}

/// An event whose completion waits on tracked background tasks.
pub struct ExtendableEvent<T> {
    kind: EventKind,
    pending: Vec<JoinHandle<Result<T>>>,
}

impl<T: Send + 'static> ExtendableEvent<T> {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            pending: Vec::new(),
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Spawns `work` and extends the event until it settles.
    pub fn wait_until<F>(&mut self, work: F)
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        self.pending.push(tokio::spawn(work));
    }

    /// Waits for every tracked task.
    ///
    /// All tasks are awaited even after a failure; the first error is returned.
    pub async fn settle(self) -> Result<Vec<T>> {
        debug!(
            "Settling {} event with {} pending task(s)",
            self.kind.as_str(),
            self.pending.len()
        );

        let mut outputs = Vec::with_capacity(self.pending.len());
        let mut first_error = None;

        for handle in self.pending {
            let outcome = match handle.await {
                Ok(result) => result,
                Err(join_err) => {
                    error!("{} task aborted: {}", self.kind.as_str(), join_err);
                    Err(WorkerError::Internal(format!(
                        "{} task did not complete: {}",
                        self.kind.as_str(),
                        join_err
                    )))
                }
            };

            match outcome {
                Ok(value) => outputs.push(value),
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(outputs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_settle_waits_for_work() {
        let done = Arc::new(AtomicBool::new(false));
        let flag = done.clone();

        let mut event = ExtendableEvent::new(EventKind::Install);
        event.wait_until(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            flag.store(true, Ordering::SeqCst);
            Ok(7)
        });

        let outputs = event.settle().await.unwrap();
        assert_eq!(outputs, vec![7]);
        assert!(done.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_settle_returns_first_error_after_all_tasks() {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = finished.clone();

        let mut event = ExtendableEvent::<()>::new(EventKind::Activate);
        event.wait_until(async { Err(WorkerError::Network("first".into())) });
        event.wait_until(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            flag.store(true, Ordering::SeqCst);
            Err(WorkerError::Network("second".into()))
        });

        let result = event.settle().await;
        assert!(matches!(result, Err(WorkerError::Network(msg)) if msg == "first"));
        assert!(finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_settle_reports_panicked_task() {
        let mut event = ExtendableEvent::<()>::new(EventKind::Install);
        event.wait_until(async {
            if true {
                panic!("boom");
            }
            Ok(())
        });

        let result = event.settle().await;
        assert!(matches!(result, Err(WorkerError::Internal(_))));
    }

    #[tokio::test]
    async fn test_settle_without_work() {
        let event = ExtendableEvent::<u8>::new(EventKind::Activate);
        assert!(event.settle().await.unwrap().is_empty());
    }
}
