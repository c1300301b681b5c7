//! 首页实时搜索

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cache::keys::{LIVE_SEARCH_TTL, live_search_key};
use crate::cache::{CacheStats, ObjectCache, read_through};
use crate::errors::Result;
use crate::storage::{SeaOrmStorage, ServiceDetail, Tag};

pub const MAX_TAG_HITS: u64 = 3;
pub const MAX_SERVICE_HITS: u64 = 8;

/// 搜索结果条目，标签与服务共用一个结构
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// 标签结果使用负数 id，避免与服务 id 冲突
    pub id: i32,
    pub name: String,
    pub url: String,
    pub description: String,
    pub icon: Option<String>,
    pub click_count: i64,
    pub category_id: i32,
    pub category_name: String,
    pub category_slug: String,
    pub is_tag: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_id: Option<i32>,
}

impl From<Tag> for SearchResult {
    fn from(tag: Tag) -> Self {
        Self {
            id: -tag.id,
            url: format!("/tag/{}", urlencoding::encode(&tag.name)),
            description: format!("View all sites tagged \"{}\"", tag.name),
            name: tag.name,
            icon: None,
            click_count: 0,
            category_id: 0,
            category_name: "Tag".to_string(),
            category_slug: "tag".to_string(),
            is_tag: true,
            tag_id: Some(tag.id),
        }
    }
}

impl From<ServiceDetail> for SearchResult {
    fn from(detail: ServiceDetail) -> Self {
        let service = detail.service;
        Self {
            id: service.id,
            name: service.name,
            url: service.url,
            description: service.description,
            icon: service.icon,
            click_count: service.click_count,
            category_id: service.category_id,
            category_name: detail.category_name.unwrap_or_default(),
            category_slug: detail.category_slug.unwrap_or_default(),
            is_tag: false,
            tag_id: None,
        }
    }
}

pub struct SearchService {
    storage: Arc<SeaOrmStorage>,
    cache: Arc<dyn ObjectCache>,
    stats: Arc<CacheStats>,
}

impl SearchService {
    pub fn new(
        storage: Arc<SeaOrmStorage>,
        cache: Arc<dyn ObjectCache>,
        stats: Arc<CacheStats>,
    ) -> Self {
        Self {
            storage,
            cache,
            stats,
        }
    }

    /// 标签在前（最多 3 个），服务在后（最多 8 个，按点击量降序）
    ///
    /// 结果缓存 60 秒，写操作不会主动失效。
    pub async fn live_search(&self, raw_query: &str) -> Result<Vec<SearchResult>> {
        let query = raw_query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let key = live_search_key(query);
        read_through(self.cache.as_ref(), &self.stats, &key, LIVE_SEARCH_TTL, || {
            self.search_uncached(query)
        })
        .await
    }

    async fn search_uncached(&self, query: &str) -> Result<Vec<SearchResult>> {
        let tags = self.storage.search_tags(query, MAX_TAG_HITS).await?;
        let services = self.storage.search_services(query, MAX_SERVICE_HITS).await?;

        Ok(tags
            .into_iter()
            .map(SearchResult::from)
            .chain(services.into_iter().map(SearchResult::from))
            .collect())
    }
}
