//! API Module
//!
//! HTTP handlers and routing for the worker host.
//!
//! # Endpoints
//! - `GET /__sw/health` - Health check endpoint
//! - `GET /__sw/state` - Worker lifecycle state
//! - `GET /__sw/stats` - Fetch statistics
//! - `GET /__sw/caches` - Cache buckets and their entries
//! - `POST /__sw/install` - Dispatch the install event
//! - `POST /__sw/activate` - Dispatch the activate event
//! - anything else - Intercepted and answered by the worker

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::{create_router, ADMIN_PREFIX};
