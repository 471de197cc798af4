//! Unified cache key schema
//!
//! All services must use these key generators to ensure consistency.
//! Key format: v{VERSION}:{kind}:{identifier}
//!
//! Namespacing by resource kind makes cross-kind collisions structurally
//! impossible: two distinct kinds can never derive the same key.

use uuid::Uuid;

/// Cache schema version - increment when changing key formats
pub const CACHE_VERSION: u32 = 1;

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Post snapshot cache
    /// Format: v1:post:{post_id}
    pub fn post(post_id: Uuid) -> String {
        format!("v{}:post:{}", CACHE_VERSION, post_id)
    }

    /// Report snapshot cache
    /// Format: v1:report:{report_id}
    pub fn report(report_id: Uuid) -> String {
        format!("v{}:report:{}", CACHE_VERSION, report_id)
    }

    /// Extract resource kind from key
    pub fn kind(key: &str) -> Option<&str> {
        // Format: v{N}:{kind}:...
        let parts: Vec<&str> = key.split(':').collect();
        if parts.len() >= 2 {
            Some(parts[1])
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_key() {
        let post_id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let key = CacheKey::post(post_id);
        assert_eq!(key, "v1:post:550e8400-e29b-41d4-a716-446655440000");
    }

    #[test]
    fn test_report_key() {
        let report_id = Uuid::parse_str("660e8400-e29b-41d4-a716-446655440001").unwrap();
        let key = CacheKey::report(report_id);
        assert_eq!(key, "v1:report:660e8400-e29b-41d4-a716-446655440001");
    }

    #[test]
    fn test_keys_are_deterministic() {
        let id = Uuid::new_v4();
        assert_eq!(CacheKey::post(id), CacheKey::post(id));
    }

    #[test]
    fn test_kinds_never_collide() {
        let id = Uuid::new_v4();
        assert_ne!(CacheKey::post(id), CacheKey::report(id));
    }

    #[test]
    fn test_kind() {
        assert_eq!(CacheKey::kind("v1:post:123"), Some("post"));
        assert_eq!(CacheKey::kind("v1:report:123"), Some("report"));
        assert_eq!(CacheKey::kind("invalid"), None);
    }
}
