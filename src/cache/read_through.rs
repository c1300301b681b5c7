use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Serialize, de::DeserializeOwned};
use tracing::{trace, warn};

use crate::cache::{CacheResult, ObjectCache};
use crate::errors::Result;

/// 命中/未命中计数
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }
}

/// 先查缓存，未命中时计算并写回
///
/// 缓存中的值无法反序列化为 `T` 时按未命中处理。计算失败时不写缓存，
/// 错误原样返回。
pub async fn read_through<T, F, Fut>(
    cache: &dyn ObjectCache,
    stats: &CacheStats,
    key: &str,
    ttl: Duration,
    compute: F,
) -> Result<T>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    if let CacheResult::Found(value) = cache.get(key).await {
        match serde_json::from_value::<T>(value) {
            Ok(hit) => {
                stats.record_hit();
                trace!("Cache hit: {}", key);
                return Ok(hit);
            }
            Err(e) => warn!("Discarding unreadable cache entry '{}': {}", key, e),
        }
    }

    stats.record_miss();
    trace!("Cache miss: {}", key);

    let fresh = compute().await?;
    match serde_json::to_value(&fresh) {
        Ok(value) => cache.insert(key, value, ttl).await,
        Err(e) => warn!("Failed to serialize value for cache key '{}': {}", key, e),
    }
    Ok(fresh)
}
