//! HTTP 路由与 handler
//!
//! - `/api/auth/*`、`/api/admin/*`：后台 API
//! - `/api/*`：公开 API
//! - `/admin/*`、`/category/{slug}`：页面

pub mod admin;
pub mod pages;
pub mod public;

use actix_web::web;

use crate::errors::AinavError;

/// 注册全部路由与提取器配置
///
/// 提取器错误统一转换为 `{success:false, message, data:null}` 的 400 响应。
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AinavError::validation(format!("Invalid request body: {}", err)).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AinavError::validation(format!("Invalid query parameters: {}", err)).into()
    }))
    .app_data(
        web::PathConfig::default()
            .error_handler(|_err, _req| AinavError::validation("Invalid ID").into()),
    )
    .service(
        web::scope("/api")
            .service(admin::routes::auth_routes())
            .service(admin::routes::admin_routes())
            .configure(public::public_routes),
    )
    .configure(pages::page_routes);
}
