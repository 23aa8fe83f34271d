//! On-disk store for prior query results
//!
//! Each entry is a single JSON file named by the deterministic query hash,
//! written with the temp file + rename pattern so a `put` can never be torn
//! by a concurrent `get`. Any failure to read or decode a persisted entry
//! degrades to a miss: falling back to the network is always preferred over
//! failing the run.
//!
//! Concurrent processes take no lock on the store; single-entry atomicity is
//! the only cross-run guarantee.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, warn};

use crate::constants::{cache, files};
use crate::errors::{CacheError, CacheResult};

/// Cache store configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Cache directory; `None` selects the per-OS default
    pub cache_root: Option<PathBuf>,
    /// Entry time-to-live
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_root: None,
            ttl: cache::ENTRY_TTL,
        }
    }
}

/// Persisted query result, owned exclusively by the store
#[derive(Debug, Deserialize)]
struct CacheEntry<T> {
    #[allow(dead_code)]
    query_hash: String,
    fetched_at: DateTime<Utc>,
    payload: Vec<T>,
}

/// Borrowed view used when encoding an entry for persistence
#[derive(Serialize)]
struct CacheEntryRef<'a, T> {
    query_hash: &'a str,
    fetched_at: DateTime<Utc>,
    payload: &'a [T],
}

/// Key/value persistence for resolved query payloads
#[derive(Debug)]
pub struct CacheStore {
    root: PathBuf,
    ttl: Duration,
}

impl CacheStore {
    /// Create a store rooted at the configured or default directory
    ///
    /// Directory creation is deferred to the first `put`, so an unusable
    /// cache location never prevents a run from starting.
    pub fn new(config: CacheConfig) -> Self {
        let root = config
            .cache_root
            .unwrap_or_else(Self::default_cache_dir);
        debug!("Cache store rooted at: {}", root.display());
        Self {
            root,
            ttl: config.ttl,
        }
    }

    /// Default cache directory for the current OS
    ///
    /// - macOS: ~/Library/Application Support/vod-fetcher/cache
    /// - Linux: ~/.config/vod-fetcher/cache
    /// - Windows: %APPDATA%/vod-fetcher/cache
    fn default_cache_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(cache::DIR_NAME)
            .join(cache::CACHE_SUBDIR)
    }

    /// The directory holding cache entries
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, query_hash: &str) -> PathBuf {
        self.root.join(format!("{}.json", query_hash))
    }

    /// Look up a fresh entry, returning its payload on a hit
    ///
    /// Returns `None` when no entry exists, the entry has outlived its TTL,
    /// or the persisted state cannot be read or decoded.
    pub async fn get<T: DeserializeOwned>(&self, query_hash: &str) -> Option<Vec<T>> {
        let path = self.entry_path(query_hash);

        let raw = match fs::read(&path).await {
            Ok(raw) => raw,
            Err(_) => return None,
        };

        let entry: CacheEntry<T> = match serde_json::from_slice(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(
                    "Discarding corrupt cache entry {}: {}",
                    path.display(),
                    e
                );
                return None;
            }
        };

        let age = Utc::now().signed_duration_since(entry.fetched_at);
        if age.to_std().map_or(true, |age| age > self.ttl) {
            debug!("Cache entry expired for query {}", query_hash);
            return None;
        }

        debug!("Cache hit for query {}", query_hash);
        Some(entry.payload)
    }

    /// Store or overwrite the entry for a query, stamped with the current time
    ///
    /// Writes to a temp path and renames into place, so concurrent readers
    /// observe either the old entry or the new one, never a partial write.
    pub async fn put<T: Serialize>(&self, query_hash: &str, payload: &[T]) -> CacheResult<()> {
        fs::create_dir_all(&self.root).await.map_err(|_| {
            CacheError::DirectoryNotAccessible {
                path: self.root.clone(),
            }
        })?;

        let entry = CacheEntryRef {
            query_hash,
            fetched_at: Utc::now(),
            payload,
        };
        let encoded = serde_json::to_vec_pretty(&entry)?;

        let final_path = self.entry_path(query_hash);
        let temp_path = self
            .root
            .join(format!("{}.json{}", query_hash, files::TEMP_FILE_SUFFIX));

        fs::write(&temp_path, &encoded).await?;
        if let Err(e) = fs::rename(&temp_path, &final_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(CacheError::Io(e));
        }

        debug!("Cached result for query {}", query_hash);
        Ok(())
    }

    /// Remove every entry, guaranteeing only fresh results for this run
    pub async fn invalidate_all(&self) -> CacheResult<()> {
        let mut dir = match fs::read_dir(&self.root).await {
            Ok(dir) => dir,
            // A store that was never written has nothing to invalidate
            Err(_) => return Ok(()),
        };

        let mut removed = 0usize;
        while let Some(dir_entry) = dir.next_entry().await? {
            let path = dir_entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                fs::remove_file(&path).await?;
                removed += 1;
            }
        }

        debug!("Invalidated {} cache entries", removed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    use crate::app::models::Show;

    fn store_in(dir: &Path, ttl: Duration) -> CacheStore {
        CacheStore::new(CacheConfig {
            cache_root: Some(dir.to_path_buf()),
            ttl,
        })
    }

    fn sample_show() -> Show {
        Show {
            id: 17,
            title: "Quick Looks".to_string(),
            api_detail_url: Some("https://example.com/api/video_shows/17/".to_string()),
        }
    }

    #[tokio::test]
    async fn test_put_then_get_roundtrip() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path(), Duration::from_secs(60));

        store.put("abc123", &[sample_show()]).await.unwrap();
        let payload: Vec<Show> = store.get("abc123").await.unwrap();

        assert_eq!(payload.len(), 1);
        assert_eq!(payload[0].title, "Quick Looks");
    }

    #[tokio::test]
    async fn test_missing_entry_is_a_miss() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path(), Duration::from_secs(60));

        let result: Option<Vec<Show>> = store.get("does-not-exist").await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_expired_entry_is_a_miss() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path(), Duration::from_secs(0));

        store.put("abc123", &[sample_show()]).await.unwrap();
        let result: Option<Vec<Show>> = store.get("abc123").await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_entry_degrades_to_miss() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path(), Duration::from_secs(60));

        fs::create_dir_all(store.root()).await.unwrap();
        fs::write(dir.path().join("bad.json"), b"{ not json")
            .await
            .unwrap();

        let result: Option<Vec<Show>> = store.get("bad").await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_empty_payload_is_a_hit() {
        // A cached NotFound replays without a network call
        let dir = tempdir().unwrap();
        let store = store_in(dir.path(), Duration::from_secs(60));

        let empty: [Show; 0] = [];
        store.put("nomatch", &empty).await.unwrap();

        let payload: Vec<Show> = store.get("nomatch").await.unwrap();
        assert!(payload.is_empty());
    }

    #[tokio::test]
    async fn test_invalidate_all_clears_entries() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path(), Duration::from_secs(60));

        store.put("one", &[sample_show()]).await.unwrap();
        store.put("two", &[sample_show()]).await.unwrap();
        store.invalidate_all().await.unwrap();

        let one: Option<Vec<Show>> = store.get("one").await;
        let two: Option<Vec<Show>> = store.get("two").await;
        assert!(one.is_none());
        assert!(two.is_none());
    }

    #[tokio::test]
    async fn test_invalidate_on_fresh_store_is_ok() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir.path().join("never-created"), Duration::from_secs(60));
        assert!(store.invalidate_all().await.is_ok());
    }

    #[tokio::test]
    async fn test_put_overwrites_previous_entry() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path(), Duration::from_secs(60));

        store.put("k", &[sample_show()]).await.unwrap();
        let replacement = Show {
            id: 99,
            title: "Endurance Run".to_string(),
            api_detail_url: None,
        };
        store.put("k", &[replacement]).await.unwrap();

        let payload: Vec<Show> = store.get("k").await.unwrap();
        assert_eq!(payload[0].id, 99);
    }

    #[tokio::test]
    async fn test_no_temp_files_left_behind() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path(), Duration::from_secs(60));
        store.put("k", &[sample_show()]).await.unwrap();

        let mut entries = fs::read_dir(dir.path()).await.unwrap();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            let name = entry.file_name();
            assert!(
                !name.to_string_lossy().ends_with(files::TEMP_FILE_SUFFIX),
                "temp file left behind: {:?}",
                name
            );
        }
    }
}
