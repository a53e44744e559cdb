//! Fetch Handler
//!
//! Answers intercepted requests cache-first with a network fallback.

use tracing::{debug, warn};

use super::ServiceWorker;
use crate::error::Result;
use crate::network::{FetchRequest, FetchResponse};

/// Where a fetch response came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseSource {
    /// Served from the named cache bucket
    Cache(String),
    /// Not cached; fetched from the network
    Network,
    /// Worker not in control; passed straight to the network
    Bypass,
}

impl ResponseSource {
    /// Value of the `x-cache` response header.
    pub fn cache_status(&self) -> &'static str {
        match self {
            ResponseSource::Cache(_) => "HIT",
            ResponseSource::Network => "MISS",
            ResponseSource::Bypass => "BYPASS",
        }
    }
}

/// Response to an intercepted request.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub response: FetchResponse,
    pub source: ResponseSource,
}

impl ServiceWorker {
    /// Handles one intercepted request.
    ///
    /// A request found in any bucket is answered without touching the
    /// network. Otherwise exactly one network call is made and its response
    /// is returned as-is; it is never written back to the cache.
    pub async fn handle_fetch(&self, request: FetchRequest) -> Result<FetchOutcome> {
        if !self.is_controlling() {
            self.stats.write().await.record_bypass();
            let response = self.fetch_network(&request).await?;
            return Ok(FetchOutcome {
                response,
                source: ResponseSource::Bypass,
            });
        }

        let cached = {
            let storage = self.storage.read().await;
            storage
                .match_request(&request)
                .map(|(bucket, entry)| (bucket.to_string(), entry.response.clone()))
        };

        if let Some((bucket, response)) = cached {
            debug!("Cache hit for {} in '{}'", request.url, bucket);
            self.stats.write().await.record_hit();
            return Ok(FetchOutcome {
                response,
                source: ResponseSource::Cache(bucket),
            });
        }

        debug!("Cache miss for {} {}", request.method, request.url);
        self.stats.write().await.record_miss();
        let response = self.fetch_network(&request).await?;
        Ok(FetchOutcome {
            response,
            source: ResponseSource::Network,
        })
    }

    async fn fetch_network(&self, request: &FetchRequest) -> Result<FetchResponse> {
        match self.network.fetch(request).await {
            Ok(response) => Ok(response),
            Err(e) => {
                warn!("Network fetch for {} failed: {}", request.url, e);
                self.stats.write().await.record_network_error();
                Err(e)
            }
        }
    }
}
