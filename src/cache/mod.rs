//! Cache Module
//!
//! Versioned cache buckets mapping requests to stored responses.

mod bucket;
mod entry;
mod key;
mod persist;
mod stats;
mod store;


// Re-export public types
pub use bucket::CacheBucket;
pub use entry::CachedResponse;
pub use key::RequestKey;
pub use persist::DiskStore;
pub use stats::FetchStats;
pub use store::CacheStorage;
