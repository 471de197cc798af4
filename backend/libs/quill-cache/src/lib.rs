//! Quill caching layer
//!
//! Redis-backed read-through cache shared by the backend services:
//! - Unified key schema with versioning
//! - Per-entry TTL with jitter
//! - JSON snapshots of API resources
//!
//! The cache is never authoritative. Every caller must be prepared for a
//! miss and fall back to the store.

mod error;
mod keys;

pub mod posts;
pub mod reports;

pub use error::{CacheError, CacheResult};
pub use keys::{CacheKey, CACHE_VERSION};

use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

/// Default TTL values (seconds)
pub mod ttl {
    /// Single-object post snapshots
    pub const POST: u64 = 3600;
    /// Single-object report snapshots
    pub const REPORT: u64 = 3600;
}

/// Core cache operations trait
#[async_trait::async_trait]
pub trait CacheOperations: Send + Sync {
    /// Get a value from cache
    async fn get<T: DeserializeOwned + Send>(&self, key: &str) -> CacheResult<Option<T>>;

    /// Set a value in cache with TTL
    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl_secs: u64,
    ) -> CacheResult<()>;

    /// Delete a key from cache
    async fn del(&self, key: &str) -> CacheResult<()>;

    /// Check if key exists
    async fn exists(&self, key: &str) -> CacheResult<bool>;
}

/// Quill cache client implementation
#[derive(Clone)]
pub struct QuillCache {
    redis: ConnectionManager,
}

impl QuillCache {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }

    /// Connect to Redis and build a cache client on top of a managed
    /// multiplexed connection.
    pub async fn connect(redis_url: &str) -> CacheResult<Self> {
        let client = Client::open(redis_url).map_err(CacheError::Redis)?;
        let manager = ConnectionManager::new(client)
            .await
            .map_err(CacheError::Redis)?;
        Ok(Self::new(manager))
    }

    /// Raw connection handle, for health probes
    pub fn connection(&self) -> ConnectionManager {
        self.redis.clone()
    }

    /// Add jitter to TTL to prevent thundering herd
    fn add_jitter(ttl_secs: u64) -> u64 {
        let jitter_percent = (rand::random::<u32>() % 10) as f64 / 100.0;
        let jitter = (ttl_secs as f64 * jitter_percent).round() as u64;
        ttl_secs + jitter
    }
}

#[async_trait::async_trait]
impl CacheOperations for QuillCache {
    async fn get<T: DeserializeOwned + Send>(&self, key: &str) -> CacheResult<Option<T>> {
        let mut conn = self.redis.clone();

        match conn.get::<_, Option<String>>(key).await {
            Ok(Some(data)) => match serde_json::from_str::<T>(&data) {
                Ok(value) => {
                    debug!(key = %key, "Cache hit");
                    Ok(Some(value))
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "Cache deserialization failed");
                    // Drop the corrupted entry so the next read repopulates it
                    let _ = conn.del::<_, ()>(key).await;
                    Ok(None)
                }
            },
            Ok(None) => {
                debug!(key = %key, "Cache miss");
                Ok(None)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Redis get error");
                Err(CacheError::Redis(e))
            }
        }
    }

    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl_secs: u64,
    ) -> CacheResult<()> {
        let data = serde_json::to_string(value).map_err(CacheError::Serialization)?;
        let ttl_with_jitter = Self::add_jitter(ttl_secs);

        let mut conn = self.redis.clone();
        conn.set_ex::<_, _, ()>(key, data, ttl_with_jitter)
            .await
            .map_err(CacheError::Redis)?;

        debug!(key = %key, ttl = ttl_with_jitter, "Cache set");
        Ok(())
    }

    async fn del(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.redis.clone();
        conn.del::<_, ()>(key).await.map_err(CacheError::Redis)?;

        debug!(key = %key, "Cache delete");
        Ok(())
    }

    async fn exists(&self, key: &str) -> CacheResult<bool> {
        let mut conn = self.redis.clone();
        let exists: bool = conn.exists(key).await.map_err(CacheError::Redis)?;
        Ok(exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_jitter() {
        let ttl = 300u64;
        let with_jitter = QuillCache::add_jitter(ttl);
        // Jitter is 0-10% of TTL
        assert!(with_jitter >= ttl);
        assert!(with_jitter <= ttl + (ttl / 10));
    }

    #[test]
    fn test_add_jitter_zero_ttl() {
        assert_eq!(QuillCache::add_jitter(0), 0);
    }
}
