//! 标签业务逻辑
//!
//! 管理端标签分页走读穿透缓存（30 秒）；任何标签写操作按前缀清空全部分页缓存。

use std::sync::Arc;

use tracing::{debug, info};

use crate::cache::keys::{ADMIN_TAGS_PREFIX, ADMIN_TAGS_TTL, admin_tags_key};
use crate::cache::{CacheStats, ObjectCache, read_through};
use crate::errors::{AinavError, Result};
use crate::storage::{SeaOrmStorage, Tag, TagListPage, TagSortOrder};

/// 管理端分页大小上限
pub const MAX_PAGE_SIZE: u64 = 100;

pub struct TagService {
    storage: Arc<SeaOrmStorage>,
    cache: Arc<dyn ObjectCache>,
    stats: Arc<CacheStats>,
}

impl TagService {
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

    pub async fn list_page(
        &self,
        page: u64,
        page_size: u64,
        order: TagSortOrder,
    ) -> Result<TagListPage> {
        let page = page.max(1);
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        let key = admin_tags_key(page, page_size, order);

        read_through(self.cache.as_ref(), &self.stats, &key, ADMIN_TAGS_TTL, || {
            self.storage.list_tags_page(page, page_size, order)
        })
        .await
    }

    pub async fn get(&self, id: i32) -> Result<Tag> {
        self.storage
            .get_tag(id)
            .await?
            .ok_or_else(|| AinavError::not_found("Tag not found"))
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Tag> {
        self.storage
            .get_tag_by_name(name.trim())
            .await?
            .ok_or_else(|| AinavError::not_found("Tag not found"))
    }

    /// 同名标签已存在时直接返回，不清缓存
    pub async fn create(&self, name: &str) -> Result<Tag> {
        let (tag, created) = self.storage.create_tag(name).await?;
        if created {
            self.invalidate().await;
        } else {
            debug!("Tag '{}' already exists (id={})", tag.name, tag.id);
        }
        Ok(tag)
    }

    pub async fn update(&self, id: i32, name: &str) -> Result<Tag> {
        let tag = self.storage.update_tag(id, name).await?;
        self.invalidate().await;
        Ok(tag)
    }

    pub async fn delete(&self, id: i32) -> Result<()> {
        self.storage.delete_tag(id).await?;
        self.invalidate().await;
        info!("Tag {} deleted", id);
        Ok(())
    }

    /// 清空全部管理端标签分页缓存
    pub async fn invalidate(&self) {
        self.cache.remove_prefix(ADMIN_TAGS_PREFIX).await;
    }
}
