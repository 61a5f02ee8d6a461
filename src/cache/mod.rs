//! Read-side cache accessor.
//!
//! [`Cache`] wraps an optional [`CacheStore`] backend. Every operation is
//! infallible to callers: backend failures are logged and degrade to a miss,
//! a no-op or an empty result, so the database stays the source of truth.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{CacheBackend, CacheConfig};

pub mod memory;
pub mod redis_store;

pub use memory::MemoryStore;
pub use redis_store::RedisStore;

/// Namespace applied to every key written by this service.
pub const KEY_PREFIX: &str = "highlights:";

/// Error types for cache backend operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Raw key/value backend storing JSON strings.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set(&self, key: &str, value: String, ttl: Option<Duration>) -> Result<(), CacheError>;

    /// Remove the given keys, returning how many existed.
    async fn delete(&self, keys: &[String]) -> Result<u64, CacheError>;

    /// List keys matching a glob pattern (`*` and `?`).
    async fn keys(&self, pattern: &str) -> Result<Vec<String>, CacheError>;
}

/// Shared cache handle; cheap to clone.
#[derive(Clone, Default)]
pub struct Cache {
    store: Option<Arc<dyn CacheStore>>,
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("backend", &self.backend_name())
            .finish()
    }
}

impl Cache {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store: Some(store) }
    }

    /// A cache that stores nothing; every read is a miss.
    pub fn disabled() -> Self {
        Self { store: None }
    }

    /// In-process LRU cache holding at most `capacity` entries.
    pub fn memory(capacity: usize) -> Self {
        Self::new(Arc::new(MemoryStore::new(capacity)))
    }

    /// Build the cache described by configuration.
    ///
    /// A Redis URL wins over the configured backend. An unreachable Redis
    /// leaves the service running with the cache disabled.
    pub async fn from_config(config: &CacheConfig) -> Self {
        if let Some(url) = config.redis_url.as_deref() {
            return match RedisStore::connect(url).await {
                Ok(store) => {
                    info!("Redis cache connected");
                    Self::new(Arc::new(store))
                }
                Err(err) => {
                    warn!(error = %err, "Redis unavailable, running without cache");
                    Self::disabled()
                }
            };
        }

        match config.backend {
            CacheBackend::Memory => {
                info!(capacity = config.memory_capacity, "Using in-memory cache");
                Self::memory(config.memory_capacity)
            }
            CacheBackend::None => {
                info!("Cache disabled");
                Self::disabled()
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.as_ref().map_or("disabled", |store| store.name())
    }

    /// Fetch and decode a value. Undecodable entries count as misses.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let store = self.store.as_ref()?;
        let full_key = namespaced(key);

        let raw = match store.get(&full_key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %full_key, "Cache miss");
                return None;
            }
            Err(err) => {
                warn!(key = %full_key, error = %err, "Cache read failed");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!(key = %full_key, "Cache hit");
                Some(value)
            }
            Err(err) => {
                warn!(key = %full_key, error = %err, "Discarding undecodable cache entry");
                None
            }
        }
    }

    /// Store a value, optionally expiring after `ttl`.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl: Option<Duration>) {
        let Some(store) = self.store.as_ref() else {
            return;
        };
        let full_key = namespaced(key);

        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(key = %full_key, error = %err, "Cache value could not be serialized");
                return;
            }
        };

        if let Err(err) = store.set(&full_key, raw, ttl).await {
            warn!(key = %full_key, error = %err, "Cache write failed");
        }
    }

    pub async fn delete(&self, key: &str) {
        let Some(store) = self.store.as_ref() else {
            return;
        };
        let full_key = namespaced(key);
        if let Err(err) = store.delete(std::slice::from_ref(&full_key)).await {
            warn!(key = %full_key, error = %err, "Cache delete failed");
        }
    }

    /// Keys matching `pattern`, without the namespace prefix.
    pub async fn list_keys(&self, pattern: &str) -> Vec<String> {
        let Some(store) = self.store.as_ref() else {
            return Vec::new();
        };

        match store.keys(&namespaced(pattern)).await {
            Ok(keys) => keys
                .into_iter()
                .filter_map(|key| key.strip_prefix(KEY_PREFIX).map(str::to_string))
                .collect(),
            Err(err) => {
                warn!(pattern, error = %err, "Cache key listing failed");
                Vec::new()
            }
        }
    }

    /// Remove every key matching `pattern` (all of this service's keys when
    /// `None`), returning the number removed.
    pub async fn flush(&self, pattern: Option<&str>) -> u64 {
        let Some(store) = self.store.as_ref() else {
            return 0;
        };
        let full_pattern = namespaced(pattern.unwrap_or("*"));

        let keys = match store.keys(&full_pattern).await {
            Ok(keys) => keys,
            Err(err) => {
                warn!(pattern = %full_pattern, error = %err, "Cache key listing failed");
                return 0;
            }
        };
        if keys.is_empty() {
            return 0;
        }

        match store.delete(&keys).await {
            Ok(count) => {
                info!(pattern = %full_pattern, flushed = count, "Flushed cache keys");
                count
            }
            Err(err) => {
                warn!(pattern = %full_pattern, error = %err, "Cache flush failed");
                0
            }
        }
    }
}

fn namespaced(key: &str) -> String {
    format!("{KEY_PREFIX}{key}")
}

/// Match `text` against a glob `pattern` supporting `*` and `?`.
pub(crate) fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let (mut p, mut t) = (0, 0);
    let mut star: Option<usize> = None;
    let mut star_text = 0;

    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == text[t]) {
            p += 1;
            t += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            star = Some(p);
            star_text = t;
            p += 1;
        } else if let Some(star_pos) = star {
            p = star_pos + 1;
            star_text += 1;
            t = star_text;
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|c| *c == '*')
}
