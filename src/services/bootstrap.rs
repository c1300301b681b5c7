//! 首次运行初始化
//!
//! 幂等：只在对应表为空时写入默认数据。

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{info, warn};

use crate::errors::Result;
use crate::storage::SeaOrmStorage;
use crate::utils::password::hash_password;

pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// (name, slug, description)
pub const DEFAULT_CATEGORIES: [(&str, &str, &str); 7] = [
    ("聊天机器人", "chatbots", "对话式 AI 助手"),
    ("图像生成", "image-generation", "文生图与图像编辑"),
    ("文本处理", "text-processing", "写作、翻译与摘要"),
    ("音频处理", "audio-processing", "语音合成、识别与音乐"),
    ("视频处理", "video-processing", "视频生成与剪辑"),
    ("开发工具", "dev-tools", "编程助手与开发者服务"),
    ("其他工具", "other-tools", "其他实用 AI 工具"),
];

pub const DEFAULT_SITE_SETTINGS: [(&str, &str); 2] = [
    ("siteName", "123.SS"),
    ("siteDescription", "收录优质AI服务和应用的导航网站"),
];

/// 初始化结果
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapReport {
    pub admin_created: bool,
    pub categories_created: usize,
    pub settings_created: usize,
}

pub async fn initialize_system(storage: &SeaOrmStorage) -> Result<BootstrapReport> {
    let mut report = BootstrapReport::default();

    if storage.count_admins().await? == 0 {
        let hash = hash_password(DEFAULT_ADMIN_PASSWORD)?;
        storage
            .create_admin(DEFAULT_ADMIN_USERNAME, &hash)
            .await?;
        report.admin_created = true;
        warn!(
            "Created default admin account '{}', change its password after first login",
            DEFAULT_ADMIN_USERNAME
        );
    }

    if storage.count_categories().await? == 0 {
        report.categories_created = storage.seed_categories(&DEFAULT_CATEGORIES).await?;
        info!("Created {} default categories", report.categories_created);
    }

    if storage.count_settings().await? == 0 {
        let defaults: BTreeMap<String, String> = DEFAULT_SITE_SETTINGS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        storage.upsert_settings(&defaults).await?;
        report.settings_created = defaults.len();
        info!("Created default site settings");
    }

    Ok(report)
}
