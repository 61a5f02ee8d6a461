//! Redis-backed cache store.

use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, instrument};

use super::{CacheError, CacheStore};

const SCAN_BATCH: usize = 500;

/// Cache store on a shared Redis connection manager.
#[derive(Clone)]
pub struct RedisStore {
    manager: ConnectionManager,
}

impl RedisStore {
    /// Connect and verify the server answers `PING`.
    #[instrument(skip(url))]
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = Client::open(url)?;
        let manager = ConnectionManager::new(client).await?;

        let mut conn = manager.clone();
        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await?;

        Ok(Self { manager })
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.manager.clone();
        Ok(conn.get(key).await?)
    }

    async fn set(&self, key: &str, value: String, ttl: Option<Duration>) -> Result<(), CacheError> {
        let mut conn = self.manager.clone();
        match ttl {
            // SET EX rejects zero, so round sub-second TTLs up
            Some(ttl) => {
                let seconds = ttl.as_secs().max(1);
                conn.set_ex::<_, _, ()>(key, value, seconds).await?;
            }
            None => conn.set::<_, _, ()>(key, value).await?,
        }
        debug!(key, "Cache set");
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> Result<u64, CacheError> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut conn = self.manager.clone();
        Ok(conn.del(keys).await?)
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>, CacheError> {
        let mut conn = self.manager.clone();
        let mut cursor: u64 = 0;
        let mut keys = Vec::new();

        // SCAN instead of KEYS so large keyspaces do not block the server
        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await?;
            keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }

        keys.sort();
        keys.dedup();
        Ok(keys)
    }
}
