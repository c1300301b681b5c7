//! 站点设置（键值对）

use std::collections::BTreeMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::info;

use super::{SeaOrmStorage, map_db_err};
use crate::errors::{AinavError, Result};

use migration::entities::setting;

impl SeaOrmStorage {
    pub async fn get_settings(&self) -> Result<BTreeMap<String, String>> {
        let models = setting::Entity::find()
            .order_by_asc(setting::Column::Key)
            .all(&self.db)
            .await
            .map_err(|e| map_db_err("查询设置失败", e))?;
        Ok(models.into_iter().map(|m| (m.key, m.value)).collect())
    }

    pub async fn count_settings(&self) -> Result<u64> {
        setting::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| map_db_err("统计设置失败", e))
    }

    /// 逐键 upsert，全部在一个事务内完成
    pub async fn upsert_settings(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if values.keys().any(|k| k.trim().is_empty()) {
            return Err(AinavError::validation("Setting key cannot be empty"));
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| map_db_err("开始事务失败", e))?;

        let now = Utc::now();
        for (key, value) in values {
            let existing = setting::Entity::find()
                .filter(setting::Column::Key.eq(key.as_str()))
                .one(&txn)
                .await
                .map_err(|e| map_db_err("查询设置失败", e))?;

            match existing {
                Some(model) => {
                    let mut active: setting::ActiveModel = model.into();
                    active.value = Set(value.clone());
                    active.updated_at = Set(now);
                    active
                        .update(&txn)
                        .await
                        .map_err(|e| map_db_err("更新设置失败", e))?;
                }
                None => {
                    setting::ActiveModel {
                        key: Set(key.clone()),
                        value: Set(value.clone()),
                        created_at: Set(now),
                        updated_at: Set(now),
                        ..Default::default()
                    }
                    .insert(&txn)
                    .await
                    .map_err(|e| map_db_err("写入设置失败", e))?;
                }
            }
        }

        txn.commit()
            .await
            .map_err(|e| map_db_err("提交事务失败", e))?;

        info!("Saved {} settings", values.len());
        Ok(())
    }
}
