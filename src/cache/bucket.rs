//! Cache Bucket Module
//!
//! A named, versioned mapping from request keys to stored responses.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cache::{CachedResponse, RequestKey};
use crate::network::{FetchRequest, FetchResponse};

// == Cache Bucket ==
/// One named cache, e.g. `youtube-subtitle-v1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheBucket {
    name: String,
    created_at: DateTime<Utc>,
    entries: BTreeMap<RequestKey, CachedResponse>,
}

impl CacheBucket {
    // == Constructor ==
    /// Creates an empty bucket.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            created_at: Utc::now(),
            entries: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    // == Match ==
    /// Looks up the stored response for a request.
    ///
    /// Only GET requests match.
    pub fn match_request(&self, request: &FetchRequest) -> Option<&CachedResponse> {
        if !request.is_cacheable() {
            return None;
        }
        self.entries.get(&request.key())
    }

    /// Looks up a stored response by key.
    pub fn get(&self, key: &RequestKey) -> Option<&CachedResponse> {
        self.entries.get(key)
    }

    // == Put All ==
    /// Stores a batch of responses, replacing previous entries with the same key.
    pub fn put_all(&mut self, entries: Vec<(RequestKey, FetchResponse)>) {
        for (key, response) in entries {
            self.entries.insert(key, CachedResponse::new(response));
        }
    }

    // == Delete ==
    /// Removes one entry, returning whether it existed.
    pub fn delete(&mut self, key: &RequestKey) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Stored keys in sorted order.
    pub fn keys(&self) -> Vec<RequestKey> {
        self.entries.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
