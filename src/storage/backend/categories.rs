//! 分类查询与变更

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use tracing::info;

use super::{SeaOrmStorage, map_db_err};
use crate::errors::{AinavError, Result};
use crate::storage::models::{
    Category, CategoryInput, CategoryWithCount, SortOrderUpdate, normalize_optional,
};

use migration::entities::{category, service};

impl SeaOrmStorage {
    /// 全部分类，按 sort_order 升序（同值按 id）
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        let models = category::Entity::find()
            .order_by_asc(category::Column::SortOrder)
            .order_by_asc(category::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| map_db_err("查询分类失败", e))?;
        Ok(models.into_iter().map(Category::from).collect())
    }

    /// 分类列表附带服务数量（管理端）
    pub async fn list_categories_with_counts(&self) -> Result<Vec<CategoryWithCount>> {
        let categories = self.list_categories().await?;

        let counts: HashMap<i32, i64> = service::Entity::find()
            .select_only()
            .column(service::Column::CategoryId)
            .column_as(service::Column::Id.count(), "count")
            .group_by(service::Column::CategoryId)
            .into_tuple::<(i32, i64)>()
            .all(&self.db)
            .await
            .map_err(|e| map_db_err("统计分类服务数失败", e))?
            .into_iter()
            .collect();

        Ok(categories
            .into_iter()
            .map(|category| {
                let service_count = counts.get(&category.id).copied().unwrap_or(0);
                CategoryWithCount {
                    category,
                    service_count,
                }
            })
            .collect())
    }

    pub async fn get_category(&self, id: i32) -> Result<Option<Category>> {
        category::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map(|m| m.map(Category::from))
            .map_err(|e| map_db_err("查询分类失败", e))
    }

    pub async fn get_category_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        category::Entity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map(|m| m.map(Category::from))
            .map_err(|e| map_db_err("查询分类失败", e))
    }

    pub async fn count_categories(&self) -> Result<u64> {
        category::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| map_db_err("统计分类失败", e))
    }

    pub async fn create_category(&self, input: CategoryInput) -> Result<Category> {
        input.validate_create()?;
        let name = input.name.unwrap_or_default().trim().to_string();
        let slug = input.slug.unwrap_or_default().trim().to_string();

        if self.get_category_by_slug(&slug).await?.is_some() {
            return Err(AinavError::validation("Category slug already exists"));
        }

        let now = Utc::now();
        let model = category::ActiveModel {
            name: Set(name),
            slug: Set(slug),
            description: Set(normalize_optional(input.description)),
            icon: Set(normalize_optional(input.icon)),
            sort_order: Set(input.sort_order.unwrap_or(0)),
            seo_title: Set(normalize_optional(input.seo_title)),
            seo_description: Set(normalize_optional(input.seo_description)),
            seo_keywords: Set(normalize_optional(input.seo_keywords)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| map_db_err("创建分类失败", e))?;

        info!("Category created: {} ({})", model.name, model.slug);
        Ok(model.into())
    }

    /// 部分更新，未提供的字段保持不变
    pub async fn update_category(&self, id: i32, input: CategoryInput) -> Result<Category> {
        input.validate_update()?;

        let existing = category::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| map_db_err("查询分类失败", e))?
            .ok_or_else(|| AinavError::not_found("Category not found"))?;

        if let Some(slug) = input.slug.as_deref().map(str::trim)
            && slug != existing.slug
            && self.get_category_by_slug(slug).await?.is_some()
        {
            return Err(AinavError::validation("Category slug already exists"));
        }

        let mut active: category::ActiveModel = existing.into();
        if let Some(name) = input.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(slug) = input.slug {
            active.slug = Set(slug.trim().to_string());
        }
        if input.description.is_some() {
            active.description = Set(normalize_optional(input.description));
        }
        if input.icon.is_some() {
            active.icon = Set(normalize_optional(input.icon));
        }
        if let Some(sort_order) = input.sort_order {
            active.sort_order = Set(sort_order);
        }
        if input.seo_title.is_some() {
            active.seo_title = Set(normalize_optional(input.seo_title));
        }
        if input.seo_description.is_some() {
            active.seo_description = Set(normalize_optional(input.seo_description));
        }
        if input.seo_keywords.is_some() {
            active.seo_keywords = Set(normalize_optional(input.seo_keywords));
        }
        active.updated_at = Set(Utc::now());

        let model = active
            .update(&self.db)
            .await
            .map_err(|e| map_db_err("更新分类失败", e))?;
        Ok(model.into())
    }

    /// 删除分类；仍有服务引用时拒绝
    ///
    /// 返回被删除的分类（调用方据此清理图标文件）。
    pub async fn delete_category(&self, id: i32) -> Result<Category> {
        let existing = category::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| map_db_err("查询分类失败", e))?
            .ok_or_else(|| AinavError::not_found("Category not found"))?;

        let in_use = service::Entity::find()
            .filter(service::Column::CategoryId.eq(id))
            .count(&self.db)
            .await
            .map_err(|e| map_db_err("统计分类服务数失败", e))?;
        if in_use > 0 {
            return Err(AinavError::validation(format!(
                "Category still has {} services, move or delete them first",
                in_use
            )));
        }

        category::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| map_db_err("删除分类失败", e))?;

        info!("Category deleted: {}", existing.slug);
        Ok(existing.into())
    }

    /// 批量更新排序（单事务，任一 id 不存在则整体回滚）
    pub async fn reorder_categories(&self, updates: &[SortOrderUpdate]) -> Result<()> {
        if updates.is_empty() {
            return Ok(());
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| map_db_err("开始事务失败", e))?;

        let now = Utc::now();
        for update in updates {
            let result = category::Entity::update_many()
                .col_expr(
                    category::Column::SortOrder,
                    sea_orm::sea_query::Expr::value(update.sort_order),
                )
                .col_expr(
                    category::Column::UpdatedAt,
                    sea_orm::sea_query::Expr::value(now),
                )
                .filter(category::Column::Id.eq(update.id))
                .exec(&txn)
                .await
                .map_err(|e| map_db_err("更新分类排序失败", e))?;

            if result.rows_affected == 0 {
                // txn 在 drop 时回滚
                return Err(AinavError::not_found(format!(
                    "Category not found: {}",
                    update.id
                )));
            }
        }

        txn.commit()
            .await
            .map_err(|e| map_db_err("提交事务失败", e))?;

        info!("Reordered {} categories", updates.len());
        Ok(())
    }

    /// 首次运行时写入默认分类
    pub async fn seed_categories(&self, defaults: &[(&str, &str, &str)]) -> Result<usize> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| map_db_err("开始事务失败", e))?;

        let now = Utc::now();
        for (index, (name, slug, description)) in defaults.iter().enumerate() {
            category::ActiveModel {
                name: Set((*name).to_string()),
                slug: Set((*slug).to_string()),
                description: Set(Some((*description).to_string())),
                icon: Set(None),
                sort_order: Set(index as i32),
                seo_title: Set(None),
                seo_description: Set(None),
                seo_keywords: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| map_db_err("写入默认分类失败", e))?;
        }

        txn.commit()
            .await
            .map_err(|e| map_db_err("提交事务失败", e))?;
        Ok(defaults.len())
    }
}
