//! 管理端分类 CRUD 与批量排序

use std::sync::Arc;

use actix_web::{Responder, Result as ActixResult, web};
use tracing::{info, trace};

use crate::errors::AinavError;
use crate::services::UploadService;
use crate::storage::{CategoryInput, SeaOrmStorage, SortOrderUpdate};

use super::guard::AdminSession;
use super::helpers::{success_response, success_with_message};

pub async fn list_categories(
    _session: AdminSession,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    let categories = storage.list_categories_with_counts().await?;
    trace!("Admin API: {} categories", categories.len());
    Ok(success_response(categories))
}

pub async fn create_category(
    _session: AdminSession,
    body: web::Json<CategoryInput>,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    let category = storage.create_category(body.into_inner()).await?;
    Ok(success_with_message("Category created", category))
}

/// 批量更新排序 `[{id, sortOrder}]`
pub async fn reorder_categories(
    _session: AdminSession,
    body: web::Json<Vec<SortOrderUpdate>>,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    storage.reorder_categories(&body).await?;
    let categories = storage.list_categories_with_counts().await?;
    Ok(success_with_message("Sort order updated", categories))
}

pub async fn get_category(
    _session: AdminSession,
    path: web::Path<i32>,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    let category = storage
        .get_category(path.into_inner())
        .await?
        .ok_or_else(|| AinavError::not_found("Category not found"))?;
    Ok(success_response(category))
}

pub async fn update_category(
    _session: AdminSession,
    path: web::Path<i32>,
    body: web::Json<CategoryInput>,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    let category = storage
        .update_category(path.into_inner(), body.into_inner())
        .await?;
    Ok(success_with_message("Category updated", category))
}

/// 删除分类后清理其上传的图标
pub async fn delete_category(
    _session: AdminSession,
    path: web::Path<i32>,
    storage: web::Data<Arc<SeaOrmStorage>>,
    uploads: web::Data<Arc<UploadService>>,
) -> ActixResult<impl Responder> {
    let category = storage.delete_category(path.into_inner()).await?;
    uploads.remove_by_url(category.icon.as_deref()).await;

    info!("Admin API: category {} deleted", category.id);
    Ok(success_with_message("Category deleted", category))
}
