//! Response DTOs for the worker host API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{CacheBucket, FetchStats};
use crate::worker::WorkerState;

/// Outcome of an install step (POST /__sw/install)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstallReport {
    /// Bucket that was populated
    pub cache_name: String,
    /// Request keys stored, in pre-cache order
    pub cached: Vec<String>,
}

/// Outcome of an activate step (POST /__sw/activate)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivateReport {
    /// Bucket that was kept
    pub cache_name: String,
    /// Stale buckets that were deleted
    pub deleted: Vec<String>,
    /// Stale buckets whose deletion failed
    pub failed: Vec<String>,
}

impl ActivateReport {
    /// Creates an empty report for the current bucket
    pub fn new(cache_name: impl Into<String>) -> Self {
        Self {
            cache_name: cache_name.into(),
            deleted: Vec::new(),
            failed: Vec::new(),
        }
    }
}

/// Response body for the state endpoint (GET /__sw/state)
#[derive(Debug, Clone, Serialize)]
pub struct StateResponse {
    pub state: WorkerState,
    /// Whether intercepted requests are answered by the worker
    pub controlling: bool,
    pub cache_name: String,
    pub precache_urls: Vec<String>,
}

/// Response body for the stats endpoint (GET /__sw/stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub bypasses: u64,
    pub network_errors: u64,
    /// hits / (hits + misses)
    pub hit_rate: f64,
}

impl From<FetchStats> for StatsResponse {
    fn from(stats: FetchStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            bypasses: stats.bypasses,
            network_errors: stats.network_errors,
        }
    }
}

/// One bucket as listed by GET /__sw/caches
#[derive(Debug, Clone, Serialize)]
pub struct BucketSummary {
    pub name: String,
    /// Creation timestamp in RFC 3339 format
    pub created_at: String,
    pub entries: usize,
    pub keys: Vec<String>,
    /// True for the bucket matching the configured cache name
    pub current: bool,
}

impl BucketSummary {
    pub fn from_bucket(bucket: &CacheBucket, cache_name: &str) -> Self {
        Self {
            name: bucket.name().to_string(),
            created_at: bucket.created_at().to_rfc3339(),
            entries: bucket.len(),
            keys: bucket.keys().iter().map(|k| k.to_string()).collect(),
            current: bucket.name() == cache_name,
        }
    }
}

/// Response body for the caches endpoint (GET /__sw/caches)
#[derive(Debug, Clone, Serialize)]
pub struct CachesResponse {
    pub caches: Vec<BucketSummary>,
}

/// Response body for the health endpoint (GET /__sw/health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status ("healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
