//! 横幅查询与变更

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::info;

use super::{SeaOrmStorage, map_db_err};
use crate::errors::{AinavError, Result};
use crate::storage::models::{Banner, BannerInput, normalize_optional};

use migration::entities::banner;

impl SeaOrmStorage {
    /// sort_order 升序，同值时最新在前
    pub async fn list_banners(&self) -> Result<Vec<Banner>> {
        let models = banner::Entity::find()
            .order_by_asc(banner::Column::SortOrder)
            .order_by_desc(banner::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| map_db_err("查询横幅失败", e))?;
        Ok(models.into_iter().map(Banner::from).collect())
    }

    pub async fn get_banner(&self, id: i32) -> Result<Option<Banner>> {
        banner::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map(|m| m.map(Banner::from))
            .map_err(|e| map_db_err("查询横幅失败", e))
    }

    /// 首页展示的横幅：排序最靠前的启用项
    pub async fn active_banner(&self) -> Result<Option<Banner>> {
        banner::Entity::find()
            .filter(banner::Column::IsActive.eq(true))
            .order_by_asc(banner::Column::SortOrder)
            .order_by_desc(banner::Column::CreatedAt)
            .one(&self.db)
            .await
            .map(|m| m.map(Banner::from))
            .map_err(|e| map_db_err("查询横幅失败", e))
    }

    pub async fn create_banner(&self, input: BannerInput) -> Result<Banner> {
        input.validate_create()?;

        let now = Utc::now();
        let model = banner::ActiveModel {
            title: Set(input.title.unwrap_or_default().trim().to_string()),
            url: Set(input.url.unwrap_or_default().trim().to_string()),
            image_url: Set(input.image_url.unwrap_or_default().trim().to_string()),
            description: Set(normalize_optional(input.description)),
            is_active: Set(input.is_active.unwrap_or(true)),
            sort_order: Set(input.sort_order.unwrap_or(0)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| map_db_err("创建横幅失败", e))?;

        info!("Banner created: {} (id={})", model.title, model.id);
        Ok(model.into())
    }

    /// 部分更新，返回 (旧值, 新值)，调用方比较 imageUrl 决定是否清理旧图
    pub async fn update_banner(&self, id: i32, input: BannerInput) -> Result<(Banner, Banner)> {
        let existing = banner::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| map_db_err("查询横幅失败", e))?
            .ok_or_else(|| AinavError::not_found("Banner not found"))?;
        let before = Banner::from(existing.clone());

        let mut active: banner::ActiveModel = existing.into();
        if let Some(title) = input.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(AinavError::validation("Banner title cannot be empty"));
            }
            active.title = Set(title);
        }
        if let Some(url) = input.url {
            active.url = Set(url.trim().to_string());
        }
        if let Some(image_url) = input.image_url {
            active.image_url = Set(image_url.trim().to_string());
        }
        if input.description.is_some() {
            active.description = Set(normalize_optional(input.description));
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        if let Some(sort_order) = input.sort_order {
            active.sort_order = Set(sort_order);
        }
        active.updated_at = Set(Utc::now());

        let model = active
            .update(&self.db)
            .await
            .map_err(|e| map_db_err("更新横幅失败", e))?;
        Ok((before, model.into()))
    }

    pub async fn delete_banner(&self, id: i32) -> Result<Banner> {
        let existing = banner::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| map_db_err("查询横幅失败", e))?
            .ok_or_else(|| AinavError::not_found("Banner not found"))?;

        banner::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| map_db_err("删除横幅失败", e))?;

        info!("Banner deleted: {}", id);
        Ok(existing.into())
    }
}
