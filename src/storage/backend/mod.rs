//! SeaORM storage backend
//!
//! This module provides database storage using SeaORM,
//! supporting SQLite, MySQL/MariaDB, and PostgreSQL.

mod admins;
mod banners;
mod categories;
mod connection;
mod services;
mod settings;
mod stats;
mod tags;

use sea_orm::{DatabaseConnection, DbErr};
use tracing::{info, warn};

use crate::config::DatabaseConfig;
use crate::errors::{AinavError, Result};

pub use connection::{connect_generic, connect_sqlite, run_migrations};

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite:")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(AinavError::database_config(format!(
            "无法从 URL 推断数据库类型: {}. 支持的 URL 格式: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// SeaORM-based storage backend
///
/// 持有进程级连接池，启动时创建、关闭时显式释放。
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
}

impl SeaOrmStorage {
    /// 连接数据库并运行迁移
    pub async fn new(database_url: &str) -> Result<Self> {
        Self::with_pool(database_url, &DatabaseConfig::default()).await
    }

    /// 按配置创建（连接池大小与超时）
    pub async fn from_config(config: &DatabaseConfig) -> Result<Self> {
        Self::with_pool(&config.database_url, config).await
    }

    async fn with_pool(database_url: &str, config: &DatabaseConfig) -> Result<Self> {
        if database_url.is_empty() {
            return Err(AinavError::database_config("DATABASE_URL 未设置"));
        }

        let backend_name = infer_backend_from_url(database_url)?;
        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url).await?
        } else {
            connect_generic(database_url, &backend_name, config.pool_size, config.timeout).await?
        };

        let storage = SeaOrmStorage { db, backend_name };
        run_migrations(&storage.db).await?;

        info!("{} storage initialized", storage.backend_name.to_uppercase());
        Ok(storage)
    }

    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    /// 获取数据库连接
    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// 关闭连接池（优雅关闭时调用）
    pub async fn close(self) {
        if let Err(e) = self.db.close().await {
            warn!("Failed to close database pool: {}", e);
        } else {
            info!("Database pool closed");
        }
    }
}

/// 唯一约束冲突判断（并发写入同名数据时由数据库兜底）
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    let msg = err.to_string().to_lowercase();
    msg.contains("unique") || msg.contains("duplicate")
}

/// DbErr → AinavError，唯一约束冲突映射为 Conflict
pub(crate) fn map_db_err(context: &str, err: DbErr) -> AinavError {
    if is_unique_violation(&err) {
        AinavError::conflict(format!("{}: duplicate value", context))
    } else {
        AinavError::database_operation(format!("{}: {}", context, err))
    }
}

/// 分页偏移量，溢出或超出 i64 范围时封顶为 i64::MAX（数据库只接受有符号偏移）
pub(crate) fn page_offset(page: u64, page_size: u64) -> u64 {
    page.saturating_sub(1)
        .checked_mul(page_size)
        .map_or(i64::MAX as u64, |offset| offset.min(i64::MAX as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_offset() {
        assert_eq!(page_offset(0, 10), 0);
        assert_eq!(page_offset(1, 10), 0);
        assert_eq!(page_offset(3, 24), 48);
        assert_eq!(page_offset(u64::MAX, 24), i64::MAX as u64);
        assert_eq!(page_offset(100_000_000_000_000_000, 100), i64::MAX as u64);
    }
}
