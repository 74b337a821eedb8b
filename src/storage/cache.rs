//! Response cache backends.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::storage::{CachedResponse, EntryMeta, ResponseCache};

/// Filesystem cache: one body file and one metadata file per entry.
#[derive(Debug, Clone)]
pub struct DiskCache {
    root_dir: PathBuf,
}

impl DiskCache {
    /// Create a cache rooted at the given directory. The directory is created
    /// on first write.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    fn body_path(&self, key: &str) -> PathBuf {
        self.root_dir.join(format!("{key}.bin"))
    }

    fn meta_path(&self, key: &str) -> PathBuf {
        self.root_dir.join(format!("{key}.json"))
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_optional(path: &PathBuf) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Write bytes atomically (write to temp, then rename).
    ///
    /// Every call stages into its own temp file, so concurrent writers of
    /// the same entry never share one.
    async fn write_atomic(path: &PathBuf, bytes: &[u8]) -> Result<()> {
        static NEXT_TMP: AtomicU64 = AtomicU64::new(0);

        let seq = NEXT_TMP.fetch_add(1, Ordering::Relaxed);
        let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(format!(".{}.{seq}.tmp", std::process::id()));
        let tmp = path.with_file_name(tmp_name);

        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        if let Err(e) = tokio::fs::rename(&tmp, path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(AppError::Io(e));
        }
        Ok(())
    }
}

#[async_trait]
impl ResponseCache for DiskCache {
    async fn get(&self, key: &str) -> Result<Option<CachedResponse>> {
        // Metadata is written last, so its presence marks a complete entry.
        let Some(meta_bytes) = Self::read_optional(&self.meta_path(key)).await? else {
            return Ok(None);
        };
        let Some(body) = Self::read_optional(&self.body_path(key)).await? else {
            return Ok(None);
        };
        let meta: EntryMeta = serde_json::from_slice(&meta_bytes)?;
        Ok(Some(CachedResponse { meta, body }))
    }

    async fn put(&self, key: &str, response: &CachedResponse) -> Result<()> {
        tokio::fs::create_dir_all(&self.root_dir).await?;
        Self::write_atomic(&self.body_path(key), &response.body).await?;
        let meta = serde_json::to_vec_pretty(&response.meta)?;
        Self::write_atomic(&self.meta_path(key), &meta).await
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_dir_all(&self.root_dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(AppError::Io(e)),
        }
        log::debug!("Cleared response cache at {}", self.root_dir.display());
        Ok(())
    }
}

/// In-process cache, dropped with the fetcher.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CachedResponse>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ResponseCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<CachedResponse>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| AppError::validation("memory cache lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    async fn put(&self, key: &str, response: &CachedResponse) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| AppError::validation("memory cache lock poisoned"))?;
        entries.insert(key.to_string(), response.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| AppError::validation("memory cache lock poisoned"))?;
        entries.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::cache_key;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_disk_put_and_get() {
        let tmp = TempDir::new().unwrap();
        let cache = DiskCache::new(tmp.path().join("http"));
        let key = cache_key("GET", "https://example.com/");

        let response = CachedResponse::new("GET", "https://example.com/", 200, b"<html/>".to_vec());
        cache.put(&key, &response).await.unwrap();

        let loaded = cache.get(&key).await.unwrap().unwrap();
        assert_eq!(loaded.body, b"<html/>");
        assert_eq!(loaded.meta.url, "https://example.com/");
        assert_eq!(loaded.meta.status, 200);
    }

    #[tokio::test]
    async fn test_disk_miss_without_directory() {
        let tmp = TempDir::new().unwrap();
        let cache = DiskCache::new(tmp.path().join("missing"));
        assert!(cache.get("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_disk_clear_removes_entries() {
        let tmp = TempDir::new().unwrap();
        let cache = DiskCache::new(tmp.path().join("http"));
        let response = CachedResponse::new("GET", "https://example.com/", 200, vec![1, 2, 3]);
        cache.put("k", &response).await.unwrap();

        cache.clear().await.unwrap();
        assert!(cache.get("k").await.unwrap().is_none());

        // Clearing an already empty cache is fine.
        cache.clear().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_disk_concurrent_puts_same_key() {
        let tmp = TempDir::new().unwrap();
        let cache = DiskCache::new(tmp.path().join("http"));
        let key = cache_key("GET", "https://example.com/dup");

        for round in 0..50u8 {
            let writers: Vec<_> = (0..4u8)
                .map(|writer| {
                    let cache = cache.clone();
                    let key = key.clone();
                    let body = vec![round.wrapping_mul(4).wrapping_add(writer); 64 * 1024];
                    tokio::spawn(async move {
                        let response =
                            CachedResponse::new("GET", "https://example.com/dup", 200, body);
                        cache.put(&key, &response).await
                    })
                })
                .collect();
            for writer in writers {
                writer.await.unwrap().unwrap();
            }

            let loaded = cache.get(&key).await.unwrap().unwrap();
            assert_eq!(loaded.body.len(), 64 * 1024);
            assert!(loaded.body.iter().all(|b| *b == loaded.body[0]));
        }

        let leftovers: Vec<_> = std::fs::read_dir(tmp.path().join("http"))
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn test_memory_cache_roundtrip_and_clear() {
        let cache = MemoryCache::new();
        let response = CachedResponse::new("GET", "https://example.com/", 200, vec![42]);
        cache.put("k", &response).await.unwrap();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("k").await.unwrap(), Some(response));

        cache.clear().await.unwrap();
        assert!(cache.is_empty());
    }
}
