//! API Handlers
//!
//! HTTP request handlers for the worker host endpoints and the intercepted
//! traffic.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};

use crate::config::Config;
use crate::error::{Result, WorkerError};
use crate::models::{
    ActivateReport, BucketSummary, CachesResponse, HealthResponse, InstallReport, StateResponse,
    StatsResponse,
};
use crate::network::FetchRequest;
use crate::worker::{FetchOutcome, ServiceWorker};

/// Largest request body forwarded to the network; larger bodies get 413.
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The worker answering intercepted requests
    pub worker: Arc<ServiceWorker>,
}

impl AppState {
    /// Creates a new AppState around a worker.
    pub fn new(worker: ServiceWorker) -> Self {
        Self {
            worker: Arc::new(worker),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(ServiceWorker::from_config(config)?))
    }
}

impl IntoResponse for FetchOutcome {
    fn into_response(self) -> Response {
        self.response.into_http(self.source.cache_status())
    }
}

/// Fallback handler for every intercepted request.
///
/// Cache hits are answered locally; everything else goes to the network.
/// Network failures surface as 502 responses.
pub async fn fetch_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<FetchOutcome> {
    let body = body.map_err(|rejection| match rejection.status() {
        StatusCode::PAYLOAD_TOO_LARGE => WorkerError::PayloadTooLarge(rejection.body_text()),
        _ => WorkerError::InvalidRequest(rejection.body_text()),
    })?;

    let url = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    let request = FetchRequest {
        method,
        url,
        headers,
        body,
    };

    state.worker.handle_fetch(request).await
}

/// Handler for POST /__sw/install
pub async fn install_handler(State(state): State<AppState>) -> Result<Json<InstallReport>> {
    let report = state.worker.dispatch_install().await?;
    Ok(Json(report))
}

/// Handler for POST /__sw/activate
pub async fn activate_handler(State(state): State<AppState>) -> Result<Json<ActivateReport>> {
    let report = state.worker.dispatch_activate().await?;
    Ok(Json(report))
}

/// Handler for GET /__sw/state
pub async fn state_handler(State(state): State<AppState>) -> Json<StateResponse> {
    let worker = &state.worker;
    Json(StateResponse {
        state: worker.state().await,
        controlling: worker.is_controlling(),
        cache_name: worker.cache_name().to_string(),
        precache_urls: worker.precache_urls().to_vec(),
    })
}

/// Handler for GET /__sw/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.worker.stats().await))
}

/// Handler for GET /__sw/caches
pub async fn caches_handler(State(state): State<AppState>) -> Json<CachesResponse> {
    let storage = state.worker.storage();
    let storage = storage.read().await;
    let cache_name = state.worker.cache_name();

    Json(CachesResponse {
        caches: storage
            .buckets()
            .iter()
            .map(|bucket| BucketSummary::from_bucket(bucket, cache_name))
            .collect(),
    })
}

/// Handler for GET /__sw/health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
