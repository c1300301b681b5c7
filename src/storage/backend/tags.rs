//! 标签查询与变更

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, FromQueryResult, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
    sea_query::Expr,
};
use tracing::info;

use super::{SeaOrmStorage, map_db_err, page_offset};
use crate::errors::{AinavError, Result};
use crate::storage::models::{Pagination, Tag, TagListPage, TagSortOrder, TagWithCount};

use migration::entities::{service, service_tag, tag};

/// 标签 + 关联服务数
#[derive(Debug, FromQueryResult)]
struct TagCountRow {
    id: i32,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    service_count: i64,
}

impl From<TagCountRow> for TagWithCount {
    fn from(row: TagCountRow) -> Self {
        TagWithCount {
            tag: Tag {
                id: row.id,
                name: row.name,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            service_count: row.service_count,
        }
    }
}

/// 分类内标签使用次数
#[derive(Debug, FromQueryResult)]
struct TagUsageRow {
    tag_id: i32,
    usage: i64,
}

impl SeaOrmStorage {
    /// LEFT JOIN service_tags 统计数量的基础查询
    fn tags_with_count_query() -> sea_orm::Select<tag::Entity> {
        tag::Entity::find()
            .select_only()
            .column(tag::Column::Id)
            .column(tag::Column::Name)
            .column(tag::Column::CreatedAt)
            .column(tag::Column::UpdatedAt)
            .column_as(service_tag::Column::ServiceId.count(), "service_count")
            .join(JoinType::LeftJoin, tag::Relation::ServiceTag.def())
            .group_by(tag::Column::Id)
            .group_by(tag::Column::Name)
            .group_by(tag::Column::CreatedAt)
            .group_by(tag::Column::UpdatedAt)
    }

    /// 管理端标签分页：按服务数排序，同数按名称升序
    pub async fn list_tags_page(
        &self,
        page: u64,
        page_size: u64,
        order: TagSortOrder,
    ) -> Result<TagListPage> {
        let page = page.max(1);
        let page_size = page_size.clamp(1, i64::MAX as u64);

        let total = self.count_tags().await?;

        let query = Self::tags_with_count_query();
        let query = match order {
            TagSortOrder::Descend => query.order_by_desc(Expr::cust("service_count")),
            TagSortOrder::Ascend => query.order_by_asc(Expr::cust("service_count")),
        };

        let rows = query
            .order_by_asc(tag::Column::Name)
            .limit(page_size)
            .offset(page_offset(page, page_size))
            .into_model::<TagCountRow>()
            .all(&self.db)
            .await
            .map_err(|e| map_db_err("查询标签列表失败", e))?;

        Ok(TagListPage {
            data: rows.into_iter().map(TagWithCount::from).collect(),
            pagination: Pagination {
                current: page,
                page_size,
                total,
            },
        })
    }

    /// 全部标签及服务数（公开标签页），数量降序、名称升序
    pub async fn list_tags_with_counts(&self) -> Result<Vec<TagWithCount>> {
        let rows = Self::tags_with_count_query()
            .order_by_desc(Expr::cust("service_count"))
            .order_by_asc(tag::Column::Name)
            .into_model::<TagCountRow>()
            .all(&self.db)
            .await
            .map_err(|e| map_db_err("查询标签列表失败", e))?;
        Ok(rows.into_iter().map(TagWithCount::from).collect())
    }

    pub async fn count_tags(&self) -> Result<u64> {
        tag::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| map_db_err("统计标签失败", e))
    }

    pub async fn get_tag(&self, id: i32) -> Result<Option<Tag>> {
        tag::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map(|m| m.map(Tag::from))
            .map_err(|e| map_db_err("查询标签失败", e))
    }

    pub async fn get_tag_by_name(&self, name: &str) -> Result<Option<Tag>> {
        tag::Entity::find()
            .filter(tag::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map(|m| m.map(Tag::from))
            .map_err(|e| map_db_err("查询标签失败", e))
    }

    /// 按名称幂等创建，返回 (标签, 是否新建)
    pub async fn create_tag(&self, name: &str) -> Result<(Tag, bool)> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AinavError::validation("Tag name is required"));
        }

        if let Some(existing) = self.get_tag_by_name(name).await? {
            return Ok((existing, false));
        }

        let now = Utc::now();
        let inserted = tag::ActiveModel {
            name: Set(name.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await;

        match inserted {
            Ok(model) => {
                info!("Tag created: {}", model.name);
                Ok((model.into(), true))
            }
            // 并发创建同名标签时，唯一索引兜底后返回已存在的那条
            Err(e) if super::is_unique_violation(&e) => {
                let existing = self
                    .get_tag_by_name(name)
                    .await?
                    .ok_or_else(|| map_db_err("创建标签失败", e))?;
                Ok((existing, false))
            }
            Err(e) => Err(map_db_err("创建标签失败", e)),
        }
    }

    pub async fn update_tag(&self, id: i32, name: &str) -> Result<Tag> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AinavError::validation("Tag name is required"));
        }

        let existing = tag::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| map_db_err("查询标签失败", e))?
            .ok_or_else(|| AinavError::not_found("Tag not found"))?;

        if let Some(other) = self.get_tag_by_name(name).await?
            && other.id != id
        {
            return Err(AinavError::validation("Tag name already exists"));
        }

        let mut active: tag::ActiveModel = existing.into();
        active.name = Set(name.to_string());
        active.updated_at = Set(Utc::now());
        let model = active
            .update(&self.db)
            .await
            .map_err(|e| map_db_err("更新标签失败", e))?;
        Ok(model.into())
    }

    /// 删除标签：同一事务内先删关联再删标签，服务本身不受影响
    pub async fn delete_tag(&self, id: i32) -> Result<()> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| map_db_err("开始事务失败", e))?;

        let exists = tag::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| map_db_err("查询标签失败", e))?;
        if exists.is_none() {
            return Err(AinavError::not_found("Tag not found"));
        }

        let unlinked = service_tag::Entity::delete_many()
            .filter(service_tag::Column::TagId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| map_db_err("删除标签关联失败", e))?;

        tag::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| map_db_err("删除标签失败", e))?;

        txn.commit()
            .await
            .map_err(|e| map_db_err("提交事务失败", e))?;

        info!(
            "Tag {} deleted, {} service links removed",
            id, unlinked.rows_affected
        );
        Ok(())
    }

    /// 名称包含关键字的标签
    pub async fn search_tags(&self, keyword: &str, limit: u64) -> Result<Vec<Tag>> {
        let models = tag::Entity::find()
            .filter(tag::Column::Name.contains(keyword))
            .order_by_asc(tag::Column::Name)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| map_db_err("搜索标签失败", e))?;
        Ok(models.into_iter().map(Tag::from).collect())
    }

    /// 分类内使用最多的标签
    pub async fn top_tags_for_category(
        &self,
        category_id: i32,
        limit: u64,
    ) -> Result<Vec<TagWithCount>> {
        let usage = service_tag::Entity::find()
            .select_only()
            .column(service_tag::Column::TagId)
            .column_as(service_tag::Column::ServiceId.count(), "usage")
            .join(JoinType::InnerJoin, service_tag::Relation::Service.def())
            .filter(service::Column::CategoryId.eq(category_id))
            .group_by(service_tag::Column::TagId)
            .order_by_desc(Expr::cust("usage"))
            .order_by_asc(service_tag::Column::TagId)
            .limit(limit)
            .into_model::<TagUsageRow>()
            .all(&self.db)
            .await
            .map_err(|e| map_db_err("统计分类标签失败", e))?;

        if usage.is_empty() {
            return Ok(Vec::new());
        }

        let tags = tag::Entity::find()
            .filter(tag::Column::Id.is_in(usage.iter().map(|u| u.tag_id)))
            .all(&self.db)
            .await
            .map_err(|e| map_db_err("查询标签失败", e))?;

        // 保持 usage 的排序
        Ok(usage
            .into_iter()
            .filter_map(|u| {
                tags.iter().find(|t| t.id == u.tag_id).map(|t| TagWithCount {
                    tag: t.clone().into(),
                    service_count: u.usage,
                })
            })
            .collect())
    }
}
