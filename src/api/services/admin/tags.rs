//! 管理端标签

use std::sync::Arc;

use actix_web::{Responder, Result as ActixResult, web};

use crate::errors::AinavError;
use crate::services::TagService;
use crate::storage::TagSortOrder;

use super::guard::AdminSession;
use super::helpers::{success_response, success_with_message};
use super::types::{TagListQuery, TagNameBody};

const DEFAULT_PAGE_SIZE: u64 = 10;

/// 分页列表，默认 page=1 pageSize=10 sortOrder=descend
pub async fn list_tags(
    _session: AdminSession,
    query: web::Query<TagListQuery>,
    tags: web::Data<Arc<TagService>>,
) -> ActixResult<impl Responder> {
    let page = tags
        .list_page(
            query.page.unwrap_or(1),
            query.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            TagSortOrder::parse(query.sort_order.as_deref()),
        )
        .await?;
    Ok(success_response(page))
}

fn tag_name(body: web::Json<TagNameBody>) -> Result<String, AinavError> {
    body.into_inner()
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| AinavError::validation("Tag name is required"))
}

/// 按名称幂等创建
pub async fn create_tag(
    _session: AdminSession,
    body: web::Json<TagNameBody>,
    tags: web::Data<Arc<TagService>>,
) -> ActixResult<impl Responder> {
    let tag = tags.create(&tag_name(body)?).await?;
    Ok(success_response(tag))
}

pub async fn get_tag(
    _session: AdminSession,
    path: web::Path<i32>,
    tags: web::Data<Arc<TagService>>,
) -> ActixResult<impl Responder> {
    Ok(success_response(tags.get(path.into_inner()).await?))
}

pub async fn get_tag_by_name(
    _session: AdminSession,
    path: web::Path<String>,
    tags: web::Data<Arc<TagService>>,
) -> ActixResult<impl Responder> {
    Ok(success_response(tags.get_by_name(&path).await?))
}

pub async fn update_tag(
    _session: AdminSession,
    path: web::Path<i32>,
    body: web::Json<TagNameBody>,
    tags: web::Data<Arc<TagService>>,
) -> ActixResult<impl Responder> {
    let tag = tags.update(path.into_inner(), &tag_name(body)?).await?;
    Ok(success_with_message("Tag updated", tag))
}

/// 删除标签及其全部服务关联
pub async fn delete_tag(
    _session: AdminSession,
    path: web::Path<i32>,
    tags: web::Data<Arc<TagService>>,
) -> ActixResult<impl Responder> {
    tags.delete(path.into_inner()).await?;
    Ok(success_with_message::<Option<()>>("Tag deleted", None))
}
