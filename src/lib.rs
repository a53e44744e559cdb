//! Offline Cache - an offline-first caching worker
//!
//! Pre-caches a fixed set of URLs into a versioned cache bucket, answers
//! requests cache-first with a network fallback, and drops buckets left by
//! previous versions.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod network;
pub mod tasks;
pub mod worker;

pub use api::AppState;
pub use config::Config;
pub use error::{Result, WorkerError};
pub use tasks::spawn_lifecycle;
pub use worker::ServiceWorker;
