//! Cache Entry Module
//!
//! Defines a stored response together with its storage metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::network::FetchResponse;

// == Cached Response ==
/// A response held in a cache bucket.
///
/// Entries never expire; they live until their bucket is deleted or the
/// key is overwritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedResponse {
    /// The stored response
    pub response: FetchResponse,
    /// When the response was stored
    pub cached_at: DateTime<Utc>,
}

impl CachedResponse {
    // == Constructor ==
    /// Wraps a response, stamping it with the current time.
    pub fn new(response: FetchResponse) -> Self {
        Self {
            response,
            cached_at: Utc::now(),
        }
    }

    // == Age ==
    /// Seconds elapsed since the response was stored.
    pub fn age_secs(&self) -> i64 {
        Utc::now()
            .signed_duration_since(self.cached_at)
            .num_seconds()
            .max(0)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_entry_creation() {
        let entry = CachedResponse::new(FetchResponse::new(200, "/", "home"));

        assert_eq!(entry.response.url, "/");
        assert_eq!(entry.response.body, "home");
        assert!(entry.age_secs() <= 1);
    }

    #[test]
    fn test_entry_age() {
        let mut entry = CachedResponse::new(FetchResponse::new(200, "/", ""));
        entry.cached_at = Utc::now() - Duration::seconds(90);

        let age = entry.age_secs();
        assert!((90..=91).contains(&age));
    }

    #[test]
    fn test_entry_age_never_negative() {
        let mut entry = CachedResponse::new(FetchResponse::new(200, "/", ""));
        entry.cached_at = Utc::now() + Duration::seconds(60);

        assert_eq!(entry.age_secs(), 0);
    }
}
