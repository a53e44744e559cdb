//! Bucket Persistence
//!
//! Snapshots each cache bucket to its own JSON file so the cache survives restarts.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::cache::CacheBucket;
use crate::error::Result;

/// Directory-backed bucket snapshots, one `<hex(name)>.json` per bucket.
#[derive(Debug, Clone)]
pub struct DiskStore {
    dir: PathBuf,
}

impl DiskStore {
    /// Opens the directory, creating it if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of a bucket's snapshot file.
    ///
    /// Distinct bucket names always map to distinct files.
    pub fn bucket_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(name)))
    }

    /// Loads every snapshot, oldest bucket first.
    ///
    /// Unreadable files are skipped with a warning.
    pub fn load_all(&self) -> Result<Vec<CacheBucket>> {
        let mut buckets = Vec::new();

        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            match read_bucket(&path) {
                Ok(bucket) => {
                    debug!("Loaded cache bucket '{}' from {}", bucket.name(), path.display());
                    buckets.push(bucket);
                }
                Err(e) => warn!("Skipping unreadable cache snapshot {}: {}", path.display(), e),
            }
        }

        buckets.sort_by_key(|b| b.created_at());
        Ok(buckets)
    }

    /// Writes a bucket snapshot atomically via a temp file.
    pub fn save(&self, bucket: &CacheBucket) -> Result<()> {
        let path = self.bucket_path(bucket.name());
        let json = serde_json::to_string(bucket)?;

        let temp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp_path, &path)?;

        Ok(())
    }

    /// Removes a bucket snapshot. Missing files are not an error.
    pub fn remove(&self, name: &str) -> Result<()> {
        let path = self.bucket_path(name);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

fn read_bucket(path: &Path) -> Result<CacheBucket> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Hex-encodes a bucket name into a file stem that is safe on any filesystem.
fn file_stem(name: &str) -> String {
    hex::encode(name.as_bytes())
}
