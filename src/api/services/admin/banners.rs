//! 管理端头图

use std::sync::Arc;

use actix_web::{Responder, Result as ActixResult, web};
use tracing::info;

use crate::errors::AinavError;
use crate::services::UploadService;
use crate::storage::{BannerInput, SeaOrmStorage};

use super::guard::AdminSession;
use super::helpers::{success_response, success_with_message};

pub async fn list_banners(
    _session: AdminSession,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    Ok(success_response(storage.list_banners().await?))
}

pub async fn create_banner(
    _session: AdminSession,
    body: web::Json<BannerInput>,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    let banner = storage.create_banner(body.into_inner()).await?;
    Ok(success_with_message("Banner created", banner))
}

pub async fn get_banner(
    _session: AdminSession,
    path: web::Path<i32>,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    let banner = storage
        .get_banner(path.into_inner())
        .await?
        .ok_or_else(|| AinavError::not_found("Banner not found"))?;
    Ok(success_response(banner))
}

/// 更新头图；图片地址变化时删除旧图片
pub async fn update_banner(
    _session: AdminSession,
    path: web::Path<i32>,
    body: web::Json<BannerInput>,
    storage: web::Data<Arc<SeaOrmStorage>>,
    uploads: web::Data<Arc<UploadService>>,
) -> ActixResult<impl Responder> {
    let (before, after) = storage
        .update_banner(path.into_inner(), body.into_inner())
        .await?;

    if before.image_url != after.image_url {
        uploads.remove_by_url(Some(&before.image_url)).await;
    }
    Ok(success_with_message("Banner updated", after))
}

pub async fn delete_banner(
    _session: AdminSession,
    path: web::Path<i32>,
    storage: web::Data<Arc<SeaOrmStorage>>,
    uploads: web::Data<Arc<UploadService>>,
) -> ActixResult<impl Responder> {
    let banner = storage.delete_banner(path.into_inner()).await?;
    uploads.remove_by_url(Some(&banner.image_url)).await;

    info!("Admin API: banner {} deleted", banner.id);
    Ok(success_with_message("Banner deleted", banner))
}
