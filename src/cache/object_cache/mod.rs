pub mod memory;
pub mod null;
pub mod redis;

use std::str::FromStr;
use std::sync::Arc;

use strum::{AsRefStr, EnumString};
use tracing::{info, warn};

use crate::cache::ObjectCache;
use crate::config::CacheConfig;
use crate::errors::{AinavError, Result};

pub use memory::MemoryObjectCache;
pub use null::NullObjectCache;
pub use redis::RedisObjectCache;

/// `cache.type` 可选值
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum CacheKind {
    Redis,
    Memory,
    Null,
}

/// 按配置创建对象缓存
pub async fn create_object_cache(config: &CacheConfig) -> Result<Arc<dyn ObjectCache>> {
    let kind = CacheKind::from_str(config.cache_type.trim()).map_err(|_| {
        AinavError::cache_connection(format!(
            "Unknown cache type '{}', expected one of: redis, memory, null",
            config.cache_type
        ))
    })?;

    let cache: Arc<dyn ObjectCache> = match kind {
        CacheKind::Redis => Arc::new(
            RedisObjectCache::connect(&config.redis.url, &config.redis.key_prefix).await?,
        ),
        CacheKind::Memory => Arc::new(MemoryObjectCache::new(config.memory.max_capacity)),
        CacheKind::Null => {
            warn!("Cache disabled (cache.type = null), every lookup hits the database");
            Arc::new(NullObjectCache::new())
        }
    };

    info!("Object cache backend: {}", kind.as_ref());
    Ok(cache)
}
