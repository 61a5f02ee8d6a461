//! In-process LRU cache store with per-entry expiry.

use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::Mutex;

use super::{CacheError, CacheStore, glob_match};

struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// Bounded in-memory store; least recently used entries are evicted first.
pub struct MemoryStore {
    entries: Mutex<LruCache<String, Entry>>,
}

impl MemoryStore {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();

        match entries.get(key) {
            Some(entry) if entry.is_expired(now) => {
                entries.pop(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: String, ttl: Option<Duration>) -> Result<(), CacheError> {
        let expires_at = ttl.map(|ttl| Instant::now() + ttl);
        self.entries
            .lock()
            .await
            .put(key.to_string(), Entry { value, expires_at });
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> Result<u64, CacheError> {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        let removed = keys
            .iter()
            .filter_map(|key| entries.pop(key))
            .filter(|entry| !entry.is_expired(now))
            .count();
        Ok(removed as u64)
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>, CacheError> {
        let entries = self.entries.lock().await;
        let now = Instant::now();
        let mut keys: Vec<String> = entries
            .iter()
            .filter(|(key, entry)| !entry.is_expired(now) && glob_match(pattern, key))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stores_and_reads_values() {
        let store = MemoryStore::new(4);
        store.set("a", "1".into(), None).await.unwrap();
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("1"));
        assert_eq!(store.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn expired_entries_are_invisible() {
        let store = MemoryStore::new(4);
        store.set("gone", "1".into(), Some(Duration::ZERO)).await.unwrap();
        store
            .set("kept", "2".into(), Some(Duration::from_secs(60)))
            .await
            .unwrap();

        assert_eq!(store.get("gone").await.unwrap(), None);
        assert_eq!(store.keys("*").await.unwrap(), vec!["kept".to_string()]);
    }

    #[tokio::test]
    async fn evicts_least_recently_used_at_capacity() {
        let store = MemoryStore::new(2);
        store.set("a", "1".into(), None).await.unwrap();
        store.set("b", "2".into(), None).await.unwrap();
        store.get("a").await.unwrap();
        store.set("c", "3".into(), None).await.unwrap();

        assert_eq!(store.get("b").await.unwrap(), None);
        assert!(store.get("a").await.unwrap().is_some());
        assert!(store.get("c").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn delete_counts_only_live_entries() {
        let store = MemoryStore::new(4);
        store.set("a", "1".into(), None).await.unwrap();
        store.set("b", "2".into(), Some(Duration::ZERO)).await.unwrap();

        let removed = store
            .delete(&["a".to_string(), "b".to_string(), "c".to_string()])
            .await
            .unwrap();
        assert_eq!(removed, 1);
    }
}
