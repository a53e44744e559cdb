//! Background Tasks Module
//!
//! Contains background tasks the host runs alongside the server.
//!
//! # Tasks
//! - Lifecycle: installs the worker (with retries) and then activates it

mod lifecycle;

pub use lifecycle::{run_lifecycle, spawn_lifecycle};
