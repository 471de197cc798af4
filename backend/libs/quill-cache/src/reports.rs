//! Report caching module
//!
//! A report snapshot nests its post representation (without the derived
//! visibility flag) and carries `expire_time` so the service layer can keep
//! filtering expired entries on cache hits.

use crate::posts::CachedTag;
use crate::{ttl, CacheKey, CacheOperations, CacheResult, QuillCache};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post as embedded in cached report snapshots
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedReportPost {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub text: String,
    pub tags: Vec<CachedTag>,
    pub created_at: DateTime<Utc>,
}

/// Cached report snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedReport {
    pub id: Uuid,
    pub post: CachedReportPost,
    pub expire_time: DateTime<Utc>,
}

/// Report cache operations
#[derive(Clone)]
pub struct ReportCache {
    cache: QuillCache,
    ttl_secs: u64,
}

impl ReportCache {
    pub fn new(cache: QuillCache) -> Self {
        Self {
            cache,
            ttl_secs: ttl::REPORT,
        }
    }

    pub fn with_ttl(cache: QuillCache, ttl_secs: u64) -> Self {
        Self { cache, ttl_secs }
    }

    /// Get cached report
    pub async fn get(&self, report_id: Uuid) -> CacheResult<Option<CachedReport>> {
        let key = CacheKey::report(report_id);
        self.cache.get(&key).await
    }

    /// Cache report snapshot
    pub async fn set(&self, report: &CachedReport) -> CacheResult<()> {
        let key = CacheKey::report(report.id);
        self.cache.set(&key, report, self.ttl_secs).await
    }

    /// Invalidate report cache
    pub async fn invalidate(&self, report_id: Uuid) -> CacheResult<()> {
        let key = CacheKey::report(report_id);
        self.cache.del(&key).await
    }
}
