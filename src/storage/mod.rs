//! Storage abstractions for the HTTP response cache.
//!
//! The fetcher consults a [`ResponseCache`] before going to the network and
//! stores every successful response it receives. Entries are keyed by request
//! method and URL, so repeated identical requests are served locally.
//!
//! ## Directory Structure
//!
//! ```text
//! {cache_dir}/
//! ├── 3f1a….bin    # Raw response body
//! └── 3f1a….json   # Entry metadata (method, url, status, fetched_at)
//! ```

pub mod cache;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::Result;

pub use cache::{DiskCache, MemoryCache};

/// Metadata stored next to a cached body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMeta {
    pub method: String,
    pub url: String,
    pub status: u16,
    pub fetched_at: DateTime<Utc>,
}

/// A cached response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    pub meta: EntryMeta,
    pub body: Vec<u8>,
}

impl CachedResponse {
    pub fn new(method: &str, url: &str, status: u16, body: Vec<u8>) -> Self {
        Self {
            meta: EntryMeta {
                method: method.to_string(),
                url: url.to_string(),
                status,
                fetched_at: Utc::now(),
            },
            body,
        }
    }
}

/// Stable cache key for a request.
pub fn cache_key(method: &str, url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(method.to_ascii_uppercase().as_bytes());
    hasher.update(b" ");
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}

/// Trait for response cache backends.
#[async_trait]
pub trait ResponseCache: Send + Sync {
    /// Look up a cached response. A miss is `Ok(None)`.
    async fn get(&self, key: &str) -> Result<Option<CachedResponse>>;

    /// Store a response, replacing any previous entry for the key.
    async fn put(&self, key: &str, response: &CachedResponse) -> Result<()>;

    /// Drop every entry.
    async fn clear(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_depends_on_method_and_url() {
        let get = cache_key("GET", "https://peps.python.org/");
        assert_eq!(get, cache_key("get", "https://peps.python.org/"));
        assert_ne!(get, cache_key("HEAD", "https://peps.python.org/"));
        assert_ne!(get, cache_key("GET", "https://peps.python.org/pep-0008/"));
        assert_eq!(get.len(), 64);
    }
}
