use std::sync::Arc;

use actix_web::web;
use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::api::session::SessionManager;
use crate::cache::{CacheStats, ObjectCache, create_object_cache};
use crate::config::{StaticConfig, get_config};
use crate::services::{CatalogService, SearchService, TagService, UploadService};
use crate::storage::SeaOrmStorage;

/// 进程级共享状态，启动时创建一次，以 `web::Data` 注入 handler
pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub cache: Arc<dyn ObjectCache>,
    pub cache_stats: Arc<CacheStats>,
    pub sessions: Arc<SessionManager>,
    pub tag_service: Arc<TagService>,
    pub search_service: Arc<SearchService>,
    pub catalog_service: Arc<CatalogService>,
    pub uploads: Arc<UploadService>,
}

impl StartupContext {
    /// 按给定配置建立连接池、缓存与各业务服务
    pub async fn build(config: &StaticConfig) -> crate::errors::Result<Self> {
        let storage = Arc::new(SeaOrmStorage::from_config(&config.database).await?);
        let cache = create_object_cache(&config.cache).await?;
        let cache_stats = Arc::new(CacheStats::default());
        let sessions = Arc::new(SessionManager::from_config(&config.auth));

        let tag_service = Arc::new(TagService::new(
            storage.clone(),
            cache.clone(),
            cache_stats.clone(),
        ));
        let search_service = Arc::new(SearchService::new(
            storage.clone(),
            cache.clone(),
            cache_stats.clone(),
        ));
        let catalog_service = Arc::new(CatalogService::new(storage.clone()));
        let uploads = Arc::new(UploadService::from_config(&config.uploads));

        Ok(Self {
            storage,
            cache,
            cache_stats,
            sessions,
            tag_service,
            search_service,
            catalog_service,
            uploads,
        })
    }

    /// 注册为 actix app data
    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.storage.clone()))
            .app_data(web::Data::new(self.cache.clone()))
            .app_data(web::Data::new(self.cache_stats.clone()))
            .app_data(web::Data::new(self.sessions.clone()))
            .app_data(web::Data::new(self.tag_service.clone()))
            .app_data(web::Data::new(self.search_service.clone()))
            .app_data(web::Data::new(self.catalog_service.clone()))
            .app_data(web::Data::new(self.uploads.clone()));
    }
}

/// 准备服务器启动的上下文
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let config = get_config();
    let context = StartupContext::build(&config)
        .await
        .context("Failed to initialize storage or cache")?;

    let upload_root = context.uploads.root().to_path_buf();
    tokio::fs::create_dir_all(&upload_root)
        .await
        .with_context(|| format!("Failed to create upload directory {:?}", upload_root))?;

    if context.storage.count_admins().await? == 0 {
        warn!("No admin account exists yet, call GET /api/init or `ainav init` to create one");
    }

    info!(
        "Startup ready in {} ms (storage: {}, cache: {}, uploads: {:?})",
        start_time.elapsed().as_millis(),
        context.storage.backend_name(),
        context.cache.backend_name(),
        upload_root
    );
    Ok(context)
}
