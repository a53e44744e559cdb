//! API Routes
//!
//! Configures the Axum router: worker endpoints under `/__sw`, every other
//! request intercepted by the worker.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    activate_handler, caches_handler, fetch_handler, health_handler, install_handler,
    stats_handler, state_handler, AppState, MAX_BODY_BYTES,
};

/// Path prefix reserved for worker endpoints; never intercepted.
pub const ADMIN_PREFIX: &str = "/__sw";

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin on the worker endpoints only; intercepted
///   requests, preflights included, reach the worker untouched
/// - Body limit: `MAX_BODY_BYTES` for intercepted requests
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let admin = Router::new()
        .route("/health", get(health_handler))
        .route("/state", get(state_handler))
        .route("/stats", get(stats_handler))
        .route("/caches", get(caches_handler))
        .route("/install", post(install_handler))
        .route("/activate", post(activate_handler))
        .layer(cors);

    Router::new()
        .nest(ADMIN_PREFIX, admin)
        .fallback(fetch_handler)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
