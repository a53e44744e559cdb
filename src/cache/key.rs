//! Request Key Module
//!
//! Identity of a cached request: the request URL without its fragment.

use std::fmt;

use serde::{Deserialize, Serialize};

// == Request Key ==
/// Exact-match key for a cached request.
///
/// Two requests share a key only when their path and query are byte-identical.
/// Fragments never reach a server, so they are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestKey(String);

impl RequestKey {
    /// Builds a key from a request URL.
    pub fn new(url: &str) -> Self {
        let without_fragment = match url.find('#') {
            Some(pos) => &url[..pos],
            None => url,
        };
        Self(without_fragment.to_string())
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RequestKey {
    fn from(url: &str) -> Self {
        Self::new(url)
    }
}
