//! Admin API 路由配置
//!
//! 按资源拆分为多个 scope，统一挂在 `/api/admin` 下。

use actix_web::web;

use super::account::{change_password, get_account};
use super::auth::{login, login_rate_limiter, logout};
use super::banners::{create_banner, delete_banner, get_banner, list_banners, update_banner};
use super::categories::{
    create_category, delete_category, get_category, list_categories, reorder_categories,
    update_category,
};
use super::dashboard::{get_stats, popular_services};
use super::services::{
    create_service, delete_service, get_service, get_service_tags, list_services,
    replace_service_tags, update_service,
};
use super::settings::{get_settings, update_settings};
use super::tags::{create_tag, delete_tag, get_tag, get_tag_by_name, list_tags, update_tag};
use super::upload::upload_image;

/// 认证路由 `/auth`
///
/// - POST /auth/login - 登录（带限流）
/// - POST /auth/logout - 登出
pub fn auth_routes() -> actix_web::Scope {
    web::scope("/auth")
        .route("/login", web::post().to(login).wrap(login_rate_limiter()))
        .route("/logout", web::post().to(logout))
}

/// 分类路由 `/categories`
///
/// - GET /categories - 列表（含服务数）
/// - POST /categories - 创建
/// - PUT /categories - 批量更新排序
/// - GET/PUT/DELETE /categories/{id}
pub fn categories_routes() -> actix_web::Scope {
    web::scope("/categories")
        .route("", web::get().to(list_categories))
        .route("", web::post().to(create_category))
        .route("", web::put().to(reorder_categories))
        .route("/{id}", web::get().to(get_category))
        .route("/{id}", web::put().to(update_category))
        .route("/{id}", web::delete().to(delete_category))
}

/// 服务路由 `/services`
pub fn services_routes() -> actix_web::Scope {
    web::scope("/services")
        .route("", web::get().to(list_services))
        .route("", web::post().to(create_service))
        // /{id}/tags 需在 /{id} 之前
        .route("/{id}/tags", web::get().to(get_service_tags))
        .route("/{id}/tags", web::put().to(replace_service_tags))
        .route("/{id}", web::get().to(get_service))
        .route("/{id}", web::put().to(update_service))
        .route("/{id}", web::delete().to(delete_service))
}

/// 标签路由 `/tags`
pub fn tags_routes() -> actix_web::Scope {
    web::scope("/tags")
        .route("", web::get().to(list_tags))
        .route("", web::post().to(create_tag))
        .route("/by-name/{name}", web::get().to(get_tag_by_name))
        .route("/{id}", web::get().to(get_tag))
        .route("/{id}", web::put().to(update_tag))
        .route("/{id}", web::delete().to(delete_tag))
}

/// 头图路由 `/banners`
pub fn banners_routes() -> actix_web::Scope {
    web::scope("/banners")
        .route("", web::get().to(list_banners))
        .route("", web::post().to(create_banner))
        .route("/{id}", web::get().to(get_banner))
        .route("/{id}", web::put().to(update_banner))
        .route("/{id}", web::delete().to(delete_banner))
}

/// 账户路由 `/account`
pub fn account_routes() -> actix_web::Scope {
    web::scope("/account")
        .route("", web::get().to(get_account))
        .route("/password", web::put().to(change_password))
}

/// 管理端路由 `/admin`
///
/// 组合所有子模块路由，另含 settings / upload / stats / popular-services
pub fn admin_routes() -> actix_web::Scope {
    web::scope("/admin")
        .service(categories_routes())
        .service(services_routes())
        .service(tags_routes())
        .service(banners_routes())
        .service(account_routes())
        .route("/settings", web::get().to(get_settings))
        .route("/settings", web::put().to(update_settings))
        .route("/upload", web::post().to(upload_image))
        .route("/stats", web::get().to(get_stats))
        .route("/popular-services", web::get().to(popular_services))
}
