//! 管理员账户

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use tracing::info;

use super::{SeaOrmStorage, map_db_err};
use crate::errors::{AinavError, Result};

use migration::entities::admin;

impl SeaOrmStorage {
    pub async fn find_admin(&self, id: i32) -> Result<Option<admin::Model>> {
        admin::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| map_db_err("查询管理员失败", e))
    }

    pub async fn find_admin_by_username(&self, username: &str) -> Result<Option<admin::Model>> {
        admin::Entity::find()
            .filter(admin::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| map_db_err("查询管理员失败", e))
    }

    pub async fn count_admins(&self) -> Result<u64> {
        admin::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| map_db_err("统计管理员失败", e))
    }

    /// 创建管理员，`password_hash` 必须已是 Argon2 哈希
    pub async fn create_admin(&self, username: &str, password_hash: &str) -> Result<admin::Model> {
        let now = Utc::now();
        let model = admin::ActiveModel {
            username: Set(username.to_string()),
            password: Set(password_hash.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| map_db_err("创建管理员失败", e))?;

        info!("Admin account created: {}", model.username);
        Ok(model)
    }

    pub async fn update_admin_password(&self, id: i32, password_hash: &str) -> Result<()> {
        let existing = self
            .find_admin(id)
            .await?
            .ok_or_else(|| AinavError::not_found("Admin not found"))?;

        let mut active: admin::ActiveModel = existing.into();
        active.password = Set(password_hash.to_string());
        active.updated_at = Set(Utc::now());
        active
            .update(&self.db)
            .await
            .map_err(|e| map_db_err("更新管理员密码失败", e))?;
        Ok(())
    }
}
