//! API 请求与响应类型

use serde::{Deserialize, Serialize};

/// 统一响应包装 `{success, message, data}`
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

/// 登录请求；字段缺失由 handler 返回 400 而不是反序列化错误
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct LoginCredentials {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LoginResponse {
    pub id: i32,
    pub username: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    #[serde(default)]
    pub old_password: Option<String>,
    #[serde(default)]
    pub new_password: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct TagNameBody {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ServiceTagsBody {
    #[serde(default)]
    pub tag_ids: Option<Vec<i32>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct TagListQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub sort_order: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ServiceListQuery {
    pub category_id: Option<i32>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct TagPageQuery {
    pub page: Option<u64>,
    pub sort: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct LiveSearchQuery {
    pub q: Option<String>,
}

/// 单条消息响应体
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MessageResponse {
    pub message: String,
}
