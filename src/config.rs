//! Configuration Module
//!
//! Handles loading and managing worker configuration from environment variables.

use std::env;
use std::path::PathBuf;

/// Cache bucket name used when `CACHE_NAME` is unset.
pub const DEFAULT_CACHE_NAME: &str = "youtube-subtitle-v1";

/// URLs pre-cached on install when `PRECACHE_URLS` is unset.
pub const DEFAULT_PRECACHE_URLS: [&str; 2] = ["/", "/manifest.json"];

/// Worker and host configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Name of the current cache bucket; every other bucket is stale
    pub cache_name: String,
    /// Ordered list of URLs fetched and stored on install
    pub precache_urls: Vec<String>,
    /// Origin that intercepted requests are forwarded to
    pub upstream_url: String,
    /// HTTP server port
    pub server_port: u16,
    /// Directory for persisted cache buckets, memory-only when unset
    pub cache_dir: Option<PathBuf>,
    /// How many times the host retries a failed install
    pub install_retries: u32,
    /// Delay between install attempts in milliseconds
    pub install_retry_delay_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_NAME` - Current cache bucket name (default: youtube-subtitle-v1)
    /// - `PRECACHE_URLS` - Comma separated URL list (default: /,/manifest.json)
    /// - `UPSTREAM_URL` - Upstream origin (default: http://127.0.0.1:8080)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_DIR` - Persistence directory (default: none)
    /// - `INSTALL_RETRIES` - Install retry attempts (default: 3)
    /// - `INSTALL_RETRY_DELAY_MS` - Delay between attempts (default: 1000)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            cache_name: env::var("CACHE_NAME")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.cache_name),
            precache_urls: env::var("PRECACHE_URLS")
                .ok()
                .map(|v| parse_url_list(&v))
                .filter(|urls| !urls.is_empty())
                .unwrap_or(defaults.precache_urls),
            upstream_url: env::var("UPSTREAM_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.upstream_url),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            cache_dir: env::var("CACHE_DIR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            install_retries: env::var("INSTALL_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.install_retries),
            install_retry_delay_ms: env::var("INSTALL_RETRY_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.install_retry_delay_ms),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_name: DEFAULT_CACHE_NAME.to_string(),
            precache_urls: DEFAULT_PRECACHE_URLS.iter().map(|u| u.to_string()).collect(),
            upstream_url: "http://127.0.0.1:8080".to_string(),
            server_port: 3000,
            cache_dir: None,
            install_retries: 3,
            install_retry_delay_ms: 1000,
        }
    }
}

/// Splits a comma separated URL list, dropping blanks.
fn parse_url_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(String::from)
        .collect()
}
