use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::trace;

use crate::cache::{CacheResult, ObjectCache};

/// 不缓存任何内容，所有读取都是 Miss
pub struct NullObjectCache;

impl NullObjectCache {
    pub fn new() -> Self {
        trace!("Using NullObjectCache: nothing will be cached");
        NullObjectCache
    }
}

impl Default for NullObjectCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectCache for NullObjectCache {
    async fn get(&self, key: &str) -> CacheResult {
        trace!("NullObjectCache.get called for key: {}", key);
        CacheResult::Miss
    }

    async fn insert(&self, key: &str, _: Value, _ttl: Duration) {
        trace!("NullObjectCache.insert called for key: {}", key);
    }

    async fn remove(&self, key: &str) {
        trace!("NullObjectCache.remove called for key: {}", key);
    }

    async fn remove_prefix(&self, prefix: &str) {
        trace!("NullObjectCache.remove_prefix called for prefix: {}", prefix);
    }

    fn backend_name(&self) -> &'static str {
        "null"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_null_cache_get_always_returns_miss() {
        let cache = NullObjectCache::new();

        assert_eq!(cache.get("any_key").await, CacheResult::Miss);
        assert_eq!(cache.get("").await, CacheResult::Miss);
    }

    #[tokio::test]
    async fn test_null_cache_insert_is_noop() {
        let cache = NullObjectCache::new();

        cache
            .insert("admin:tags:1:10:descend", json!([1, 2]), Duration::from_secs(30))
            .await;

        assert_eq!(cache.get("admin:tags:1:10:descend").await, CacheResult::Miss);
    }

    #[tokio::test]
    async fn test_null_cache_remove_is_noop() {
        let cache = NullObjectCache::new();

        cache.remove("nonexistent").await;
        cache.remove_prefix("admin:tags:").await;
        cache.invalidate_all().await;
    }
}
