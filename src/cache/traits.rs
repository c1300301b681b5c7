use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult {
    /// 命中，返回缓存时写入的 JSON
    Found(Value),
    /// 未命中（包括后端出错的情况）
    Miss,
}

/// JSON 对象缓存
///
/// 所有实现都必须 fail-open：后端出错时记录日志，get 视为 Miss，
/// 写入和删除视为空操作，绝不向调用方返回错误。
#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get(&self, key: &str) -> CacheResult;
    async fn insert(&self, key: &str, value: Value, ttl: Duration);
    async fn remove(&self, key: &str);

    /// 删除所有以 `prefix` 开头的键
    async fn remove_prefix(&self, prefix: &str);

    async fn invalidate_all(&self) {
        tracing::debug!("invalidate_all not supported by this cache backend");
    }

    fn backend_name(&self) -> &'static str;
}
