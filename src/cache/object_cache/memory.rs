use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache;
use moka::policy::Expiry;
use serde_json::Value;
use tracing::{debug, trace};

use crate::cache::{CacheResult, ObjectCache};

/// 缓存条目，TTL 随值一起保存
#[derive(Clone)]
struct Entry {
    value: Value,
    ttl: Duration,
}

/// 每个条目按写入时给定的 TTL 过期
struct PerEntryExpiry;

impl Expiry<String, Entry> for PerEntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// 进程内缓存（moka），单进程部署和测试使用
pub struct MemoryObjectCache {
    inner: Cache<String, Entry>,
}

impl MemoryObjectCache {
    pub fn new(max_capacity: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryExpiry)
            .build();

        debug!(
            "MemoryObjectCache initialized with max capacity: {}",
            max_capacity
        );
        Self { inner }
    }
}

#[async_trait]
impl ObjectCache for MemoryObjectCache {
    async fn get(&self, key: &str) -> CacheResult {
        match self.inner.get(key).await {
            Some(entry) => {
                trace!("Memory cache hit: {}", key);
                CacheResult::Found(entry.value)
            }
            None => CacheResult::Miss,
        }
    }

    async fn insert(&self, key: &str, value: Value, ttl: Duration) {
        self.inner
            .insert(key.to_string(), Entry { value, ttl })
            .await;
    }

    async fn remove(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    async fn remove_prefix(&self, prefix: &str) {
        let keys: Vec<String> = self
            .inner
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.as_ref().clone())
            .collect();

        for key in &keys {
            self.inner.invalidate(key).await;
        }
        trace!("Removed {} keys with prefix '{}'", keys.len(), prefix);
    }

    async fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_insert_then_get() {
        let cache = MemoryObjectCache::new(100);
        cache
            .insert("live-search:gpt", json!([{"id": 1}]), Duration::from_secs(60))
            .await;

        assert_eq!(
            cache.get("live-search:gpt").await,
            CacheResult::Found(json!([{"id": 1}]))
        );
        assert_eq!(cache.get("live-search:other").await, CacheResult::Miss);
    }

    #[tokio::test]
    async fn test_remove_prefix_only_touches_matching_keys() {
        let cache = MemoryObjectCache::new(100);
        let ttl = Duration::from_secs(30);
        cache.insert("admin:tags:1:10:descend", json!(1), ttl).await;
        cache.insert("admin:tags:2:10:ascend", json!(2), ttl).await;
        cache.insert("live-search:x", json!(3), ttl).await;

        cache.remove_prefix("admin:tags:").await;

        assert_eq!(cache.get("admin:tags:1:10:descend").await, CacheResult::Miss);
        assert_eq!(cache.get("admin:tags:2:10:ascend").await, CacheResult::Miss);
        assert_eq!(cache.get("live-search:x").await, CacheResult::Found(json!(3)));
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let cache = MemoryObjectCache::new(100);
        cache
            .insert("short", json!("v"), Duration::from_millis(50))
            .await;

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(cache.get("short").await, CacheResult::Miss);
    }
}
