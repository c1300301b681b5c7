//! 公开 API：首页、分类、标签、搜索、点击统计、初始化

use std::sync::Arc;

use actix_web::{Responder, Result as ActixResult, web};
use tracing::{debug, info};

use crate::services::{CatalogService, SearchService, initialize_system};
use crate::storage::{SeaOrmStorage, TagServiceSort};

use super::admin::{LiveSearchQuery, TagPageQuery, no_store, success_response, success_with_message};

pub async fn live_search(
    query: web::Query<LiveSearchQuery>,
    search: web::Data<Arc<SearchService>>,
) -> ActixResult<impl Responder> {
    let results = search
        .live_search(query.q.as_deref().unwrap_or_default())
        .await?;
    Ok(success_response(results))
}

/// 首页分类区块
pub async fn list_categories(
    catalog: web::Data<Arc<CatalogService>>,
) -> ActixResult<impl Responder> {
    let sections = catalog.category_sections().await?;
    Ok(no_store(success_response(sections)))
}

/// `/api/categories/{slug}` 与 `/category/{slug}` 共用
pub async fn category_detail(
    path: web::Path<String>,
    catalog: web::Data<Arc<CatalogService>>,
) -> ActixResult<impl Responder> {
    let page = catalog.category_page(&path).await?;
    Ok(no_store(success_response(page)))
}

pub async fn popular_services(
    catalog: web::Data<Arc<CatalogService>>,
) -> ActixResult<impl Responder> {
    let services = catalog.popular_services().await?;
    Ok(no_store(success_response(services)))
}

/// 点击计数 +1（数据库内原子更新）
pub async fn record_click(
    path: web::Path<i32>,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    storage.increment_click(id).await?;
    debug!("Click recorded for service {}", id);
    Ok(success_with_message::<Option<()>>("Click recorded", None))
}

pub async fn list_tags(storage: web::Data<Arc<SeaOrmStorage>>) -> ActixResult<impl Responder> {
    Ok(success_response(storage.list_tags_with_counts().await?))
}

pub async fn tag_detail(
    path: web::Path<String>,
    query: web::Query<TagPageQuery>,
    catalog: web::Data<Arc<CatalogService>>,
) -> ActixResult<impl Responder> {
    let page = catalog
        .tag_page(
            &path,
            query.page.unwrap_or(1),
            TagServiceSort::parse(query.sort.as_deref()),
        )
        .await?;
    Ok(no_store(success_response(page)))
}

/// 当前启用的头图，没有时 data 为 null
pub async fn active_banner(
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    Ok(success_response(storage.active_banner().await?))
}

pub async fn site_settings(
    catalog: web::Data<Arc<CatalogService>>,
) -> ActixResult<impl Responder> {
    Ok(success_response(catalog.site_settings().await?))
}

/// 幂等初始化：写入默认管理员、分类与站点设置
pub async fn init_system(storage: web::Data<Arc<SeaOrmStorage>>) -> ActixResult<impl Responder> {
    let report = initialize_system(&storage).await?;
    info!("System init requested: {:?}", report);
    Ok(success_with_message("System initialized", report))
}

/// 公开 API 路由（挂在 `/api` 下）
pub fn public_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/live-search", web::get().to(live_search))
        .route("/categories", web::get().to(list_categories))
        .route("/categories/{slug}", web::get().to(category_detail))
        .route("/services/popular", web::get().to(popular_services))
        .route("/services/{id}/click", web::post().to(record_click))
        .route("/tags", web::get().to(list_tags))
        .route("/tags/{name}", web::get().to(tag_detail))
        .route("/banner", web::get().to(active_banner))
        .route("/settings", web::get().to(site_settings))
        .route("/init", web::get().to(init_system));
}
