//! Network Module
//!
//! The worker's only way out: a fetch capability and its HTTP implementation.

mod http;
mod message;

#[cfg(test)]
pub(crate) mod mock;

use async_trait::async_trait;

use crate::error::Result;

pub use http::HttpNetwork;
pub use message::{is_hop_by_hop, FetchRequest, FetchResponse};

// == Network Trait ==
/// Performs a request against the network.
///
/// Transport failures are errors; any HTTP status, including 4xx and 5xx,
/// is a successful fetch.
#[async_trait]
pub trait Network: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse>;
}
