//! Response models for the worker host API
//!
//! This module defines the DTOs (Data Transfer Objects) serialized into
//! HTTP response bodies and returned by lifecycle steps.

pub mod responses;

// Re-export commonly used types
pub use responses::{
    ActivateReport, BucketSummary, CachesResponse, ErrorResponse, HealthResponse, InstallReport,
    StateResponse, StatsResponse,
};
