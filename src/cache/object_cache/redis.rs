use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, error, trace, warn};

use crate::cache::{CacheResult, ObjectCache};
use crate::errors::{AinavError, Result};

/// SCAN 每批返回的键数量提示
const SCAN_BATCH: usize = 200;

pub struct RedisObjectCache {
    client: redis::Client,
    /// 持久化连接，使用 RwLock 保护
    connection: Arc<RwLock<Option<MultiplexedConnection>>>,
    key_prefix: String,
}

impl RedisObjectCache {
    /// 创建客户端并 PING 一次
    ///
    /// URL 非法时返回错误；服务端不可达只记录警告，之后每次操作按需重连，
    /// 期间所有读取都视为未命中。
    pub async fn connect(url: &str, key_prefix: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(|e| {
            AinavError::cache_connection(format!("Invalid Redis URL '{}': {}", url, e))
        })?;

        let cache = Self {
            client,
            connection: Arc::new(RwLock::new(None)),
            key_prefix: key_prefix.to_string(),
        };

        match cache.ping().await {
            Ok(pong) => debug!(
                "Redis connection test successful: {} (prefix '{}')",
                pong, key_prefix
            ),
            Err(e) => {
                warn!(
                    "Redis ping failed: {}. Cache disabled until {} becomes reachable",
                    e, url
                );
                cache.reset_connection().await;
            }
        }

        Ok(cache)
    }

    async fn ping(&self) -> redis::RedisResult<String> {
        let mut conn = self.get_connection().await?;
        redis::cmd("PING").query_async(&mut conn).await
    }

    /// 获取或建立持久连接
    async fn get_connection(&self) -> std::result::Result<MultiplexedConnection, redis::RedisError> {
        {
            let conn_guard = self.connection.read().await;
            if let Some(ref conn) = *conn_guard {
                return Ok(conn.clone());
            }
        }

        let mut conn_guard = self.connection.write().await;

        // 双重检查，避免竞态条件
        if let Some(ref conn) = *conn_guard {
            return Ok(conn.clone());
        }

        let new_conn = self.client.get_multiplexed_async_connection().await?;
        *conn_guard = Some(new_conn.clone());
        debug!("Redis connection established and cached");

        Ok(new_conn)
    }

    /// 重置连接（在连接错误时调用）
    async fn reset_connection(&self) {
        let mut conn_guard = self.connection.write().await;
        *conn_guard = None;
        debug!("Redis connection reset due to error");
    }

    fn make_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }

    async fn connection_or_reset(&self) -> Option<MultiplexedConnection> {
        match self.get_connection().await {
            Ok(c) => Some(c),
            Err(e) => {
                error!("Failed to get Redis connection: {}", e);
                self.reset_connection().await;
                None
            }
        }
    }

    /// SCAN MATCH 收集所有匹配的键
    async fn scan_keys(
        conn: &mut MultiplexedConnection,
        pattern: &str,
    ) -> redis::RedisResult<Vec<String>> {
        let mut cursor: u64 = 0;
        let mut keys = Vec::new();
        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(conn)
                .await?;
            keys.extend(batch);
            if next == 0 {
                return Ok(keys);
            }
            cursor = next;
        }
    }
}

/// 转义 glob 特殊字符，保证前缀按字面匹配
fn escape_glob(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl ObjectCache for RedisObjectCache {
    async fn get(&self, key: &str) -> CacheResult {
        let redis_key = self.make_key(key);
        let Some(mut conn) = self.connection_or_reset().await else {
            return CacheResult::Miss;
        };

        let result: redis::RedisResult<Option<String>> = conn.get(&redis_key).await;
        match result {
            Ok(Some(data)) => match serde_json::from_str::<Value>(&data) {
                Ok(value) => {
                    trace!("Successfully retrieved key: {}", key);
                    CacheResult::Found(value)
                }
                Err(e) => {
                    error!("Failed to deserialize cached value for key '{}': {}", key, e);
                    CacheResult::Miss
                }
            },
            Ok(None) => {
                trace!("Key not found in cache: {}", key);
                CacheResult::Miss
            }
            Err(e) => {
                error!("Failed to get key '{}': {}", key, e);
                self.reset_connection().await;
                CacheResult::Miss
            }
        }
    }

    async fn insert(&self, key: &str, value: Value, ttl: Duration) {
        let redis_key = self.make_key(key);
        let Some(mut conn) = self.connection_or_reset().await else {
            return;
        };

        let serialized = match serde_json::to_string(&value) {
            Ok(s) => s,
            Err(e) => {
                error!("Failed to serialize value for key '{}': {}", key, e);
                return;
            }
        };

        let ttl_secs = ttl.as_secs().max(1);
        match conn
            .set_ex::<String, String, ()>(redis_key, serialized, ttl_secs)
            .await
        {
            Ok(_) => trace!("Successfully inserted key into cache: {}", key),
            Err(e) => {
                error!("Failed to insert key '{}' into cache: {}", key, e);
                self.reset_connection().await;
            }
        }
    }

    async fn remove(&self, key: &str) {
        let redis_key = self.make_key(key);
        let Some(mut conn) = self.connection_or_reset().await else {
            return;
        };

        match conn.del::<String, i32>(redis_key).await {
            Ok(deleted) => trace!("Removed key '{}' ({} deleted)", key, deleted),
            Err(e) => {
                error!("Failed to remove key '{}': {}", key, e);
                self.reset_connection().await;
            }
        }
    }

    async fn remove_prefix(&self, prefix: &str) {
        let pattern = format!("{}*", escape_glob(&self.make_key(prefix)));
        let Some(mut conn) = self.connection_or_reset().await else {
            return;
        };

        let keys = match Self::scan_keys(&mut conn, &pattern).await {
            Ok(keys) => keys,
            Err(e) => {
                error!("Failed to scan keys with pattern '{}': {}", pattern, e);
                self.reset_connection().await;
                return;
            }
        };
        if keys.is_empty() {
            return;
        }

        match conn.del::<Vec<String>, i64>(keys).await {
            Ok(deleted) => debug!("Removed {} keys with prefix '{}'", deleted, prefix),
            Err(e) => {
                error!("Failed to remove keys with prefix '{}': {}", prefix, e);
                self.reset_connection().await;
            }
        }
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_glob() {
        assert_eq!(escape_glob("ainav:admin:tags:"), "ainav:admin:tags:");
        assert_eq!(escape_glob("a*b?[c]"), "a\\*b\\?\\[c\\]");
    }

    #[tokio::test]
    async fn test_unreachable_server_degrades_to_miss() {
        // 端口 1 上没有 Redis
        let cache = RedisObjectCache::connect("redis://127.0.0.1:1", "ainav-test:")
            .await
            .expect("不可达的 Redis 不应阻止启动");
        assert_eq!(cache.backend_name(), "redis");

        cache
            .insert("k", serde_json::json!({"v": 1}), Duration::from_secs(30))
            .await;
        assert!(matches!(cache.get("k").await, CacheResult::Miss));

        cache.remove("k").await;
        cache.remove_prefix("admin:tags:").await;
        assert!(matches!(cache.get("k").await, CacheResult::Miss));
    }

    #[tokio::test]
    async fn test_invalid_url_is_rejected() {
        assert!(RedisObjectCache::connect("not-a-url", "p:").await.is_err());
    }
}
