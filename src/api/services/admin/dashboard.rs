//! 后台首页统计

use std::sync::Arc;

use actix_web::{Responder, Result as ActixResult, web};

use crate::storage::SeaOrmStorage;

use super::guard::AdminSession;
use super::helpers::success_response;

const ADMIN_POPULAR_LIMIT: u64 = 10;

pub async fn get_stats(
    _session: AdminSession,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    Ok(success_response(storage.site_stats().await?))
}

/// 点击量前 10 的服务
pub async fn popular_services(
    _session: AdminSession,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    Ok(success_response(
        storage.popular_services(ADMIN_POPULAR_LIMIT).await?,
    ))
}
