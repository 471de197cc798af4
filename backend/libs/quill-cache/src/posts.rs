//! Post caching module
//!
//! Holds the serialized snapshot of a post as returned by the API at last
//! read. The snapshot carries the owner id so the service layer can re-apply
//! its visibility rules on a cache hit without touching the store.

use crate::{ttl, CacheKey, CacheOperations, CacheResult, QuillCache};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tag as embedded in cached post snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedTag {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

/// Cached post snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedPost {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub text: String,
    pub tags: Vec<CachedTag>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

/// Post cache operations
#[derive(Clone)]
pub struct PostCache {
    cache: QuillCache,
    ttl_secs: u64,
}

impl PostCache {
    pub fn new(cache: QuillCache) -> Self {
        Self {
            cache,
            ttl_secs: ttl::POST,
        }
    }

    pub fn with_ttl(cache: QuillCache, ttl_secs: u64) -> Self {
        Self { cache, ttl_secs }
    }

    /// Get cached post
    pub async fn get(&self, post_id: Uuid) -> CacheResult<Option<CachedPost>> {
        let key = CacheKey::post(post_id);
        self.cache.get(&key).await
    }

    /// Cache post snapshot
    pub async fn set(&self, post: &CachedPost) -> CacheResult<()> {
        let key = CacheKey::post(post.id);
        self.cache.set(&key, post, self.ttl_secs).await
    }

    /// Invalidate post cache
    pub async fn invalidate(&self, post_id: Uuid) -> CacheResult<()> {
        let key = CacheKey::post(post_id);
        self.cache.del(&key).await
    }
}
