//! In-memory network for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{FetchRequest, FetchResponse, Network};
use crate::error::{Result, WorkerError};

/// Serves canned responses and records every call.
#[derive(Default)]
pub struct MockNetwork {
    routes: HashMap<String, FetchResponse>,
    failing: HashSet<String>,
    delay: Option<Duration>,
    calls: Mutex<Vec<String>>,
}

impl MockNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `200 OK` with `body` for `url`.
    pub fn with_page(mut self, url: &str, body: &str) -> Self {
        self.routes.insert(
            url.to_string(),
            FetchResponse::new(200, url, body.to_string()).with_header("content-type", "text/plain"),
        );
        self
    }

    /// Serves a fixed response for `url`.
    pub fn with_response(mut self, url: &str, response: FetchResponse) -> Self {
        self.routes.insert(url.to_string(), response);
        self
    }

    /// Fails `url` with a transport error.
    pub fn with_failure(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    /// Delays every response by `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Network for MockNetwork {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse> {
        self.calls.lock().unwrap().push(request.url.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.contains(&request.url) {
            return Err(WorkerError::Network(format!(
                "connection refused: {}",
                request.url
            )));
        }

        Ok(self
            .routes
            .get(&request.url)
            .cloned()
            .unwrap_or_else(|| FetchResponse::new(404, request.url.clone(), "not found")))
    }
}
