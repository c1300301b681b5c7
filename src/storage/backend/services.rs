//! 服务查询与变更

use std::collections::{BTreeSet, HashMap};

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, ExprTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
    sea_query::{Expr, Query},
};
use tracing::{debug, info};

use super::{SeaOrmStorage, map_db_err, page_offset};
use crate::errors::{AinavError, Result};
use crate::storage::models::{
    Service, ServiceDetail, ServiceInput, Tag, TagServiceSort, normalize_optional,
};

use migration::entities::{category, service, service_tag, tag};

impl SeaOrmStorage {
    /// 批量补充分类名称与标签
    pub(crate) async fn attach_details(
        &self,
        models: Vec<service::Model>,
    ) -> Result<Vec<ServiceDetail>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let category_ids: BTreeSet<i32> = models.iter().map(|m| m.category_id).collect();
        let categories: HashMap<i32, category::Model> = category::Entity::find()
            .filter(category::Column::Id.is_in(category_ids))
            .all(&self.db)
            .await
            .map_err(|e| map_db_err("查询分类失败", e))?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let service_ids: Vec<i32> = models.iter().map(|m| m.id).collect();
        let mut tags_by_service = self.tags_for_services(&service_ids).await?;

        Ok(models
            .into_iter()
            .map(|model| {
                let category = categories.get(&model.category_id);
                let tags = tags_by_service.remove(&model.id).unwrap_or_default();
                ServiceDetail {
                    category_name: category.map(|c| c.name.clone()),
                    category_slug: category.map(|c| c.slug.clone()),
                    tags,
                    service: model.into(),
                }
            })
            .collect())
    }

    /// service_id → 标签列表（按名称排序）
    async fn tags_for_services(&self, service_ids: &[i32]) -> Result<HashMap<i32, Vec<Tag>>> {
        let links = service_tag::Entity::find()
            .filter(service_tag::Column::ServiceId.is_in(service_ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(|e| map_db_err("查询服务标签失败", e))?;
        if links.is_empty() {
            return Ok(HashMap::new());
        }

        let tag_ids: BTreeSet<i32> = links.iter().map(|l| l.tag_id).collect();
        let tags: HashMap<i32, Tag> = tag::Entity::find()
            .filter(tag::Column::Id.is_in(tag_ids))
            .order_by_asc(tag::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| map_db_err("查询标签失败", e))?
            .into_iter()
            .map(|t| (t.id, Tag::from(t)))
            .collect();

        let mut grouped: HashMap<i32, Vec<Tag>> = HashMap::new();
        for link in links {
            if let Some(tag) = tags.get(&link.tag_id) {
                grouped.entry(link.service_id).or_default().push(tag.clone());
            }
        }
        for list in grouped.values_mut() {
            list.sort_by(|a, b| a.name.cmp(&b.name));
        }
        Ok(grouped)
    }

    /// 管理端服务列表，最新在前，可按分类过滤
    pub async fn list_services(&self, category_id: Option<i32>) -> Result<Vec<ServiceDetail>> {
        let mut query = service::Entity::find();
        if let Some(category_id) = category_id {
            query = query.filter(service::Column::CategoryId.eq(category_id));
        }
        let models = query
            .order_by_desc(service::Column::CreatedAt)
            .order_by_desc(service::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| map_db_err("查询服务失败", e))?;
        self.attach_details(models).await
    }

    pub async fn get_service(&self, id: i32) -> Result<Option<Service>> {
        service::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map(|m| m.map(Service::from))
            .map_err(|e| map_db_err("查询服务失败", e))
    }

    pub async fn get_service_detail(&self, id: i32) -> Result<Option<ServiceDetail>> {
        let Some(model) = service::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| map_db_err("查询服务失败", e))?
        else {
            return Ok(None);
        };
        Ok(self.attach_details(vec![model]).await?.into_iter().next())
    }

    pub async fn count_services(&self) -> Result<u64> {
        service::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| map_db_err("统计服务失败", e))
    }

    /// 校验分类存在
    async fn ensure_category<C: ConnectionTrait>(conn: &C, category_id: i32) -> Result<()> {
        let found = category::Entity::find_by_id(category_id)
            .one(conn)
            .await
            .map_err(|e| map_db_err("查询分类失败", e))?;
        if found.is_none() {
            return Err(AinavError::validation(format!(
                "Category does not exist: {}",
                category_id
            )));
        }
        Ok(())
    }

    /// 在给定连接/事务内替换服务的标签集合
    async fn replace_tag_links<C: ConnectionTrait>(
        conn: &C,
        service_id: i32,
        tag_ids: &[i32],
    ) -> Result<()> {
        let unique: BTreeSet<i32> = tag_ids.iter().copied().collect();

        if !unique.is_empty() {
            let found = tag::Entity::find()
                .filter(tag::Column::Id.is_in(unique.iter().copied()))
                .count(conn)
                .await
                .map_err(|e| map_db_err("查询标签失败", e))?;
            if found as usize != unique.len() {
                return Err(AinavError::validation("Some tags do not exist"));
            }
        }

        service_tag::Entity::delete_many()
            .filter(service_tag::Column::ServiceId.eq(service_id))
            .exec(conn)
            .await
            .map_err(|e| map_db_err("删除服务标签失败", e))?;

        if unique.is_empty() {
            return Ok(());
        }

        let now = Utc::now();
        let links: Vec<service_tag::ActiveModel> = unique
            .into_iter()
            .map(|tag_id| service_tag::ActiveModel {
                service_id: Set(service_id),
                tag_id: Set(tag_id),
                created_at: Set(now),
            })
            .collect();
        service_tag::Entity::insert_many(links)
            .exec(conn)
            .await
            .map_err(|e| map_db_err("写入服务标签失败", e))?;
        Ok(())
    }

    pub async fn create_service(&self, input: ServiceInput) -> Result<ServiceDetail> {
        input.validate_create()?;
        let category_id = input.category_id.unwrap_or_default();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| map_db_err("开始事务失败", e))?;

        Self::ensure_category(&txn, category_id).await?;

        let now = Utc::now();
        let model = service::ActiveModel {
            name: Set(input.name.unwrap_or_default().trim().to_string()),
            url: Set(input.url.unwrap_or_default().trim().to_string()),
            description: Set(input.description.unwrap_or_default().trim().to_string()),
            icon: Set(normalize_optional(input.icon)),
            click_count: Set(0),
            category_id: Set(category_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| map_db_err("创建服务失败", e))?;

        if let Some(tag_ids) = input.tag_ids.as_deref() {
            Self::replace_tag_links(&txn, model.id, tag_ids).await?;
        }

        txn.commit()
            .await
            .map_err(|e| map_db_err("提交事务失败", e))?;

        info!("Service created: {} (id={})", model.name, model.id);
        self.get_service_detail(model.id)
            .await?
            .ok_or_else(|| AinavError::not_found("Service not found"))
    }

    /// 部分更新；提供 tagIds 时一并替换标签
    pub async fn update_service(&self, id: i32, input: ServiceInput) -> Result<ServiceDetail> {
        input.validate_update()?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| map_db_err("开始事务失败", e))?;

        let existing = service::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| map_db_err("查询服务失败", e))?
            .ok_or_else(|| AinavError::not_found("Service not found"))?;

        if let Some(category_id) = input.category_id {
            Self::ensure_category(&txn, category_id).await?;
        }

        let mut active: service::ActiveModel = existing.into();
        if let Some(name) = input.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(url) = input.url {
            active.url = Set(url.trim().to_string());
        }
        if let Some(description) = input.description {
            active.description = Set(description.trim().to_string());
        }
        if input.icon.is_some() {
            active.icon = Set(normalize_optional(input.icon));
        }
        if let Some(category_id) = input.category_id {
            active.category_id = Set(category_id);
        }
        active.updated_at = Set(Utc::now());
        active
            .update(&txn)
            .await
            .map_err(|e| map_db_err("更新服务失败", e))?;

        if let Some(tag_ids) = input.tag_ids.as_deref() {
            Self::replace_tag_links(&txn, id, tag_ids).await?;
        }

        txn.commit()
            .await
            .map_err(|e| map_db_err("提交事务失败", e))?;

        self.get_service_detail(id)
            .await?
            .ok_or_else(|| AinavError::not_found("Service not found"))
    }

    /// 删除服务：同一事务内先删标签关联再删服务
    ///
    /// 返回被删除的服务（调用方据此清理图标文件）。
    pub async fn delete_service(&self, id: i32) -> Result<Service> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| map_db_err("开始事务失败", e))?;

        let existing = service::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| map_db_err("查询服务失败", e))?
            .ok_or_else(|| AinavError::not_found("Service not found"))?;

        service_tag::Entity::delete_many()
            .filter(service_tag::Column::ServiceId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| map_db_err("删除服务标签失败", e))?;

        service::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| map_db_err("删除服务失败", e))?;

        txn.commit()
            .await
            .map_err(|e| map_db_err("提交事务失败", e))?;

        info!("Service deleted: {} (id={})", existing.name, id);
        Ok(existing.into())
    }

    pub async fn service_tags(&self, service_id: i32) -> Result<Vec<Tag>> {
        if self.get_service(service_id).await?.is_none() {
            return Err(AinavError::not_found("Service not found"));
        }
        Ok(self
            .tags_for_services(&[service_id])
            .await?
            .remove(&service_id)
            .unwrap_or_default())
    }

    /// 整体替换服务标签（单事务）
    pub async fn replace_service_tags(
        &self,
        service_id: i32,
        tag_ids: &[i32],
    ) -> Result<ServiceDetail> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| map_db_err("开始事务失败", e))?;

        let found = service::Entity::find_by_id(service_id)
            .one(&txn)
            .await
            .map_err(|e| map_db_err("查询服务失败", e))?;
        if found.is_none() {
            return Err(AinavError::not_found("Service not found"));
        }

        Self::replace_tag_links(&txn, service_id, tag_ids).await?;

        txn.commit()
            .await
            .map_err(|e| map_db_err("提交事务失败", e))?;

        self.get_service_detail(service_id)
            .await?
            .ok_or_else(|| AinavError::not_found("Service not found"))
    }

    /// 点击数 +1，单条 UPDATE 保证并发安全
    pub async fn increment_click(&self, id: i32) -> Result<()> {
        let result = service::Entity::update_many()
            .col_expr(
                service::Column::ClickCount,
                Expr::col(service::Column::ClickCount).add(1),
            )
            .filter(service::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| map_db_err("更新点击数失败", e))?;

        if result.rows_affected == 0 {
            return Err(AinavError::not_found("Service not found"));
        }
        debug!("Click recorded for service {}", id);
        Ok(())
    }

    /// 点击量最高的服务
    pub async fn popular_services(&self, limit: u64) -> Result<Vec<ServiceDetail>> {
        let models = service::Entity::find()
            .order_by_desc(service::Column::ClickCount)
            .order_by_asc(service::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| map_db_err("查询热门服务失败", e))?;
        self.attach_details(models).await
    }

    /// 分类下的服务，按点击量降序
    pub async fn services_in_category(
        &self,
        category_id: i32,
        limit: Option<u64>,
    ) -> Result<Vec<service::Model>> {
        let mut query = service::Entity::find()
            .filter(service::Column::CategoryId.eq(category_id))
            .order_by_desc(service::Column::ClickCount)
            .order_by_asc(service::Column::Id);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        query
            .all(&self.db)
            .await
            .map_err(|e| map_db_err("查询分类服务失败", e))
    }

    /// 名称或描述包含关键字的服务，按点击量降序
    pub async fn search_services(&self, keyword: &str, limit: u64) -> Result<Vec<ServiceDetail>> {
        let models = service::Entity::find()
            .filter(
                Condition::any()
                    .add(service::Column::Name.contains(keyword))
                    .add(service::Column::Description.contains(keyword)),
            )
            .order_by_desc(service::Column::ClickCount)
            .order_by_asc(service::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| map_db_err("搜索服务失败", e))?;
        self.attach_details(models).await
    }

    /// 带某标签的服务分页（排序与分页都在数据库完成）
    pub async fn services_for_tag(
        &self,
        tag_id: i32,
        page: u64,
        page_size: u64,
        sort: TagServiceSort,
    ) -> Result<(Vec<ServiceDetail>, u64)> {
        let base = service::Entity::find().filter(
            service::Column::Id.in_subquery(
                Query::select()
                    .column(service_tag::Column::ServiceId)
                    .from(service_tag::Entity)
                    .and_where(Expr::col(service_tag::Column::TagId).eq(tag_id))
                    .to_owned(),
            ),
        );

        let total = base
            .clone()
            .count(&self.db)
            .await
            .map_err(|e| map_db_err("统计标签服务失败", e))?;

        let ordered = match sort {
            TagServiceSort::Clicks => base.order_by_desc(service::Column::ClickCount),
            TagServiceSort::CreatedAt => base.order_by_desc(service::Column::CreatedAt),
        };

        let models = ordered
            .order_by_asc(service::Column::Id)
            .limit(page_size)
            .offset(page_offset(page, page_size))
            .all(&self.db)
            .await
            .map_err(|e| map_db_err("查询标签服务失败", e))?;

        Ok((self.attach_details(models).await?, total))
    }

    /// 全部服务点击总数
    ///
    /// Postgres 与 MySQL 的 SUM(bigint) 返回 NUMERIC/DECIMAL，需转回整数再解码
    pub async fn total_clicks(&self) -> Result<i64> {
        let sum_sql = match self.backend_name.as_str() {
            "postgres" => "CAST(SUM(click_count) AS BIGINT)",
            "mysql" => "CAST(SUM(click_count) AS SIGNED)",
            _ => "SUM(click_count)",
        };
        let total: Option<Option<i64>> = service::Entity::find()
            .select_only()
            .column_as(Expr::cust(sum_sql), "total")
            .into_tuple::<Option<i64>>()
            .one(&self.db)
            .await
            .map_err(|e| map_db_err("统计点击数失败", e))?;
        Ok(total.flatten().unwrap_or(0))
    }
}
