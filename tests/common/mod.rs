//! 集成测试公共环境
//!
//! 每个测试独立的临时 SQLite 库 + 内存缓存 + 临时上传目录。

#![allow(dead_code)]

use actix_web::cookie::Cookie;
use tempfile::TempDir;

use ainav::config::StaticConfig;
use ainav::runtime::lifetime::StartupContext;
use ainav::services::bootstrap::DEFAULT_ADMIN_USERNAME;
use ainav::services::initialize_system;

pub const TEST_SECRET: &str = "integration_test_secret_32_bytes";
pub const TEST_MAX_UPLOAD: usize = 1024;

pub struct TestEnv {
    pub dir: TempDir,
    pub ctx: StartupContext,
}

impl TestEnv {
    /// 已执行初始化（默认管理员、分类、设置）的环境
    pub async fn new() -> Self {
        let env = Self::empty().await;
        initialize_system(&env.ctx.storage)
            .await
            .expect("初始化默认数据失败");
        env
    }

    /// 只建表，不写任何数据
    pub async fn empty() -> Self {
        let dir = TempDir::new().expect("创建临时目录失败");

        let mut config = StaticConfig::default();
        config.database.database_url = format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("ainav_test.db").display()
        );
        config.uploads.dir = dir.path().join("uploads").to_string_lossy().to_string();
        config.uploads.max_file_size = TEST_MAX_UPLOAD;
        config.auth.session_secret = TEST_SECRET.to_string();

        let ctx = StartupContext::build(&config)
            .await
            .expect("创建 StartupContext 失败");
        Self { dir, ctx }
    }

    /// 默认管理员的有效会话 Cookie
    pub async fn admin_cookie(&self) -> Cookie<'static> {
        let admin = self
            .ctx
            .storage
            .find_admin_by_username(DEFAULT_ADMIN_USERNAME)
            .await
            .expect("查询管理员失败")
            .expect("默认管理员不存在");
        let token = self.ctx.sessions.issue(admin.id).expect("签发令牌失败");
        self.ctx.sessions.session_cookie(token)
    }

    pub fn upload_root(&self) -> std::path::PathBuf {
        self.dir.path().join("uploads")
    }
}

/// 与生产环境一致的 App：边缘中间件 + app data + 全部路由
macro_rules! init_app {
    ($env:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(ainav::api::middleware::EdgeGate::new(
                    $env.ctx.sessions.clone(),
                ))
                .configure(|cfg| $env.ctx.register(cfg))
                .configure(ainav::api::services::configure),
        )
        .await
    };
}

pub fn peer() -> std::net::SocketAddr {
    "127.0.0.1:40000".parse().unwrap()
}
