//! Read-through disk cache.
//!
//! A cache entry is a JSON file at a caller-chosen path. If the file can
//! be read and parsed as JSON it is a hit: no expiry, no revalidation, and
//! it is never overwritten. A hit that does not fit the caller's type is an
//! error, not a miss. Otherwise the resource is fetched, written to the
//! path, and returned. Failed fetches are never cached.

use crate::client::JsonSource;
use crate::error::FetchError;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// How a cache gate call resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheOutcome<T> {
    /// Fetched over the network and persisted.
    Downloaded(T),
    /// Read from an existing cache file.
    Cached(T),
    /// The fetch or the cache write failed.
    Error(String),
}

impl<T> CacheOutcome<T> {
    /// The payload, if there is one.
    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Downloaded(data) | Self::Cached(data) => Some(data),
            Self::Error(_) => None,
        }
    }

    pub fn is_cached(&self) -> bool {
        matches!(self, Self::Cached(_))
    }

    pub fn is_downloaded(&self) -> bool {
        matches!(self, Self::Downloaded(_))
    }
}

/// Wraps a [`JsonSource`] with the file-exists-means-fresh cache policy.
#[derive(Clone)]
pub struct CacheGate {
    source: Arc<dyn JsonSource>,
}

impl CacheGate {
    pub fn new(source: Arc<dyn JsonSource>) -> Self {
        Self { source }
    }

    /// Returns the cached document at `path`, or downloads `url` into it.
    ///
    /// Never fails: every error ends up in [`CacheOutcome::Error`].
    pub async fn fetch<T>(&self, url: &str, path: &Path, headers: &HeaderMap) -> CacheOutcome<T>
    where
        T: DeserializeOwned,
    {
        if let Some(value) = read_cached(path).await {
            debug!("cache hit {}", path.display());
            return match serde_json::from_value(value) {
                Ok(data) => CacheOutcome::Cached(data),
                Err(e) => {
                    debug!("cached {} has an unexpected shape: {}", path.display(), e);
                    CacheOutcome::Error(FetchError::from(e).to_string())
                }
            };
        }

        match self.download(url, path, headers).await {
            Ok(data) => CacheOutcome::Downloaded(data),
            Err(e) => {
                debug!("fetch of {} failed: {}", url, e);
                CacheOutcome::Error(e.to_string())
            }
        }
    }

    async fn download<T>(&self, url: &str, path: &Path, headers: &HeaderMap) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
    {
        let value = self.source.get_json(url, headers).await?;

        // Only documents that match the expected shape are worth caching.
        let data = T::deserialize(&value)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, serde_json::to_vec(&value)?).await?;

        Ok(data)
    }
}

async fn read_cached(path: &Path) -> Option<Value> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return None,
        Err(e) => {
            warn!("cache file {} unreadable: {}", path.display(), e);
            return None;
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(data) => Some(data),
        Err(e) => {
            warn!("cache file {} is corrupt, refetching: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    struct CountingSource {
        calls: AtomicUsize,
        reply: Option<Value>,
    }

    impl CountingSource {
        fn replying(reply: Value) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                reply: Some(reply),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                reply: None,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl JsonSource for CountingSource {
        async fn get_json(&self, url: &str, _headers: &HeaderMap) -> Result<Value, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone().ok_or_else(|| FetchError::Timeout {
                url: url.to_string(),
                after: std::time::Duration::from_millis(1),
            })
        }
    }

    #[tokio::test]
    async fn test_second_call_is_served_from_cache() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/deeper/doc.json");
        let source = CountingSource::replying(json!({ "instances": [{ "name": "a" }] }));
        let gate = CacheGate::new(source.clone());

        let first: CacheOutcome<Value> = gate.fetch("http://x", &path, &HeaderMap::new()).await;
        let on_disk = std::fs::read(&path).unwrap();
        let second: CacheOutcome<Value> = gate.fetch("http://x", &path, &HeaderMap::new()).await;

        assert!(first.is_downloaded());
        assert!(second.is_cached());
        assert_eq!(first.into_data(), second.into_data());
        assert_eq!(std::fs::read(&path).unwrap(), on_disk);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_existing_file_short_circuits_network() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(&path, r#"[1,2,3]"#).unwrap();
        let source = CountingSource::replying(json!([9]));
        let gate = CacheGate::new(source.clone());

        let outcome: CacheOutcome<Vec<u32>> = gate.fetch("http://x", &path, &HeaderMap::new()).await;

        assert_eq!(outcome, CacheOutcome::Cached(vec![1, 2, 3]));
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_cached() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");
        let source = CountingSource::failing();
        let gate = CacheGate::new(source.clone());

        let first: CacheOutcome<Value> = gate.fetch("http://x", &path, &HeaderMap::new()).await;
        let second: CacheOutcome<Value> = gate.fetch("http://x", &path, &HeaderMap::new()).await;

        assert!(matches!(first, CacheOutcome::Error(ref m) if m.contains("timed out")));
        assert!(matches!(second, CacheOutcome::Error(_)));
        assert!(!path.exists());
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_shape_mismatch_is_an_error_and_not_cached() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");
        let source = CountingSource::replying(json!({ "error": "This method requires an authenticated user" }));
        let gate = CacheGate::new(source);

        let outcome: CacheOutcome<Vec<Value>> = gate.fetch("http://x", &path, &HeaderMap::new()).await;

        assert!(matches!(outcome, CacheOutcome::Error(_)));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_mismatched_cache_file_is_an_error_and_kept() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");
        let stored = r#"{"error":"This method requires an authenticated user"}"#;
        std::fs::write(&path, stored).unwrap();
        let source = CountingSource::replying(json!([]));
        let gate = CacheGate::new(source.clone());

        let outcome: CacheOutcome<Vec<Value>> = gate.fetch("http://x", &path, &HeaderMap::new()).await;

        assert!(matches!(outcome, CacheOutcome::Error(_)));
        assert_eq!(source.calls(), 0);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), stored);
    }

    #[tokio::test]
    async fn test_corrupt_cache_is_refetched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(&path, "{ truncated").unwrap();
        let source = CountingSource::replying(json!([4]));
        let gate = CacheGate::new(source.clone());

        let outcome: CacheOutcome<Vec<u32>> = gate.fetch("http://x", &path, &HeaderMap::new()).await;

        assert_eq!(outcome, CacheOutcome::Downloaded(vec![4]));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[4]");
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_unwritable_cache_path_is_an_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        let path = blocker.join("doc.json");
        let gate = CacheGate::new(CountingSource::replying(json!([1])));

        let outcome: CacheOutcome<Vec<u32>> = gate.fetch("http://x", &path, &HeaderMap::new()).await;

        assert!(matches!(outcome, CacheOutcome::Error(ref m) if m.starts_with("Cache I/O error")));
    }
}
