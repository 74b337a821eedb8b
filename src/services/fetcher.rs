// src/services/fetcher.rs

//! Cached page fetcher.
//!
//! Performs exactly one GET per call. Cache hits are served without touching
//! the network; successful network responses are written back to the cache.

use std::sync::Arc;

use reqwest::Client;

use crate::error::{FetchError, Result};
use crate::models::Page;
use crate::storage::{CachedResponse, ResponseCache, cache_key};

const METHOD: &str = "GET";

/// Service for fetching pages through the response cache.
#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
    cache: Arc<dyn ResponseCache>,
    encoding: String,
}

impl PageFetcher {
    /// Create a fetcher using `encoding` for every decoded page.
    pub fn new(client: Client, cache: Arc<dyn ResponseCache>, encoding: impl Into<String>) -> Self {
        Self {
            client,
            cache,
            encoding: encoding.into(),
        }
    }

    /// Fetch a page for parsing.
    pub async fn fetch(&self, url: &str) -> std::result::Result<Page, FetchError> {
        let body = self.get(url).await?;
        Ok(Page::new(url, body, self.encoding.as_str()))
    }

    /// Fetch a binary resource.
    pub async fn fetch_bytes(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError> {
        self.get(url).await
    }

    /// Drop every cached response.
    pub async fn clear_cache(&self) -> Result<()> {
        self.cache.clear().await
    }

    async fn get(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError> {
        let key = cache_key(METHOD, url);

        match self.cache.get(&key).await {
            Ok(Some(hit)) => {
                log::debug!("Cache hit: {}", url);
                return Ok(hit.body);
            }
            Ok(None) => {}
            Err(e) => log::warn!("Cache read failed for {}: {}", url, e),
        }

        log::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::new(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(url, format!("HTTP status {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::new(url, e))?
            .to_vec();

        let entry = CachedResponse::new(METHOD, url, status.as_u16(), body);
        if let Err(e) = self.cache.put(&key, &entry).await {
            log::warn!("Cache write failed for {}: {}", url, e);
        }

        Ok(entry.body)
    }
}
