//! Cache Storage Module
//!
//! The set of named cache buckets the worker reads and writes, with optional
//! write-through persistence.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::cache::{CacheBucket, CachedResponse, DiskStore, RequestKey};
use crate::error::Result;
use crate::network::{FetchRequest, FetchResponse};

// == Cache Storage ==
/// Named cache buckets in creation order.
#[derive(Debug, Default)]
pub struct CacheStorage {
    /// Buckets, oldest first
    buckets: Vec<CacheBucket>,
    /// Snapshot directory, if persistence is enabled
    disk: Option<DiskStore>,
}

impl CacheStorage {
    // == Constructors ==
    /// Creates an empty, memory-only storage.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens a persistent storage, loading any buckets already on disk.
    pub fn persistent(dir: impl Into<PathBuf>) -> Result<Self> {
        let disk = DiskStore::open(dir)?;
        let buckets = disk.load_all()?;
        info!(
            "Loaded {} cache bucket(s) from {}",
            buckets.len(),
            disk.dir().display()
        );

        Ok(Self {
            buckets,
            disk: Some(disk),
        })
    }

    // == Open ==
    /// Returns the named bucket, creating it if absent.
    pub fn open(&mut self, name: &str) -> Result<&mut CacheBucket> {
        let index = match self.position(name) {
            Some(index) => index,
            None => {
                let bucket = CacheBucket::new(name);
                if let Some(disk) = &self.disk {
                    disk.save(&bucket)?;
                }
                debug!("Created cache bucket '{}'", name);
                self.buckets.push(bucket);
                self.buckets.len() - 1
            }
        };
        Ok(&mut self.buckets[index])
    }

    // == Put All ==
    /// Stores a batch of responses in the named bucket, creating it if absent.
    ///
    /// The batch is applied as a whole: when the snapshot cannot be written
    /// the bucket keeps its previous contents.
    pub fn put_all(&mut self, name: &str, entries: Vec<(RequestKey, FetchResponse)>) -> Result<usize> {
        let count = entries.len();
        let disk = self.disk.clone();
        let bucket = self.open(name)?;

        let mut updated = bucket.clone();
        updated.put_all(entries);
        if let Some(disk) = disk {
            disk.save(&updated)?;
        }
        *bucket = updated;

        Ok(count)
    }

    // == Match ==
    /// Finds a stored response for the request in any bucket.
    ///
    /// Buckets are searched oldest first; the first hit wins. Returns the
    /// bucket name alongside the response.
    pub fn match_request(&self, request: &FetchRequest) -> Option<(&str, &CachedResponse)> {
        self.buckets.iter().find_map(|bucket| {
            bucket
                .match_request(request)
                .map(|entry| (bucket.name(), entry))
        })
    }

    // == Delete ==
    /// Deletes the named bucket, returning whether it existed.
    ///
    /// The bucket leaves memory before its snapshot is removed, so a disk
    /// failure never leaves it visible to lookups.
    pub fn delete(&mut self, name: &str) -> Result<bool> {
        let Some(index) = self.position(name) else {
            return Ok(false);
        };

        self.buckets.remove(index);
        if let Some(disk) = &self.disk {
            disk.remove(name)?;
        }
        debug!("Deleted cache bucket '{}'", name);
        Ok(true)
    }

    // == Lookup ==
    pub fn has(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn bucket(&self, name: &str) -> Option<&CacheBucket> {
        self.buckets.iter().find(|b| b.name() == name)
    }

    /// Bucket names in creation order.
    pub fn keys(&self) -> Vec<String> {
        self.buckets.iter().map(|b| b.name().to_string()).collect()
    }

    pub fn buckets(&self) -> &[CacheBucket] {
        &self.buckets
    }

    /// Returns the number of buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn is_persistent(&self) -> bool {
        self.disk.is_some()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.buckets.iter().position(|b| b.name() == name)
    }
}
