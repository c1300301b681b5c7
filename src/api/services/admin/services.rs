//! 管理端服务（网站）CRUD 与标签关联

use std::sync::Arc;

use actix_web::{Responder, Result as ActixResult, web};
use tracing::{info, trace};

use crate::errors::AinavError;
use crate::services::UploadService;
use crate::storage::{SeaOrmStorage, ServiceInput};

use super::guard::AdminSession;
use super::helpers::{success_response, success_with_message};
use super::types::{ServiceListQuery, ServiceTagsBody};

/// 服务列表，最新的在前，可按分类过滤
pub async fn list_services(
    _session: AdminSession,
    query: web::Query<ServiceListQuery>,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    let services = storage.list_services(query.category_id).await?;
    trace!(
        "Admin API: {} services (category filter: {:?})",
        services.len(),
        query.category_id
    );
    Ok(success_response(services))
}

pub async fn create_service(
    _session: AdminSession,
    body: web::Json<ServiceInput>,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    let service = storage.create_service(body.into_inner()).await?;
    Ok(success_with_message("Service created", service))
}

pub async fn get_service(
    _session: AdminSession,
    path: web::Path<i32>,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    let service = storage
        .get_service_detail(path.into_inner())
        .await?
        .ok_or_else(|| AinavError::not_found("Service not found"))?;
    Ok(success_response(service))
}

pub async fn update_service(
    _session: AdminSession,
    path: web::Path<i32>,
    body: web::Json<ServiceInput>,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    let service = storage
        .update_service(path.into_inner(), body.into_inner())
        .await?;
    Ok(success_with_message("Service updated", service))
}

/// 删除服务（连同标签关联），随后清理图标文件
pub async fn delete_service(
    _session: AdminSession,
    path: web::Path<i32>,
    storage: web::Data<Arc<SeaOrmStorage>>,
    uploads: web::Data<Arc<UploadService>>,
) -> ActixResult<impl Responder> {
    let service = storage.delete_service(path.into_inner()).await?;
    uploads.remove_by_url(service.icon.as_deref()).await;

    info!("Admin API: service {} deleted", service.id);
    Ok(success_with_message("Service deleted", service))
}

pub async fn get_service_tags(
    _session: AdminSession,
    path: web::Path<i32>,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    if storage.get_service(id).await?.is_none() {
        return Err(AinavError::not_found("Service not found").into());
    }
    let tags = storage.service_tags(id).await?;
    Ok(success_response(tags))
}

/// 整体替换服务的标签集合 `{tagIds: [..]}`
pub async fn replace_service_tags(
    _session: AdminSession,
    path: web::Path<i32>,
    body: web::Json<ServiceTagsBody>,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    let tag_ids = body
        .into_inner()
        .tag_ids
        .ok_or_else(|| AinavError::validation("tagIds must be an array"))?;

    let service = storage
        .replace_service_tags(path.into_inner(), &tag_ids)
        .await?;
    Ok(success_with_message("Service tags updated", service))
}
