//! 存储层数据模型
//!
//! 实体 Model 之外的对外视图与输入结构，JSON 字段统一 camelCase。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{AinavError, Result};
use migration::entities::{admin, banner, category, service, tag};

// ============ 视图 ============

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdminAccount {
    pub id: i32,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<admin::Model> for AdminAccount {
    fn from(m: admin::Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub sort_order: i32,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub seo_keywords: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<category::Model> for Category {
    fn from(m: category::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            slug: m.slug,
            description: m.description,
            icon: m.icon,
            sort_order: m.sort_order,
            seo_title: m.seo_title,
            seo_description: m.seo_description,
            seo_keywords: m.seo_keywords,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWithCount {
    #[serde(flatten)]
    pub category: Category,
    pub service_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: i32,
    pub name: String,
    pub url: String,
    pub description: String,
    pub icon: Option<String>,
    pub click_count: i64,
    pub category_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<service::Model> for Service {
    fn from(m: service::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            url: m.url,
            description: m.description,
            icon: m.icon,
            click_count: m.click_count,
            category_id: m.category_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// 服务 + 所属分类名称 + 标签
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDetail {
    #[serde(flatten)]
    pub service: Service,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<tag::Model> for Tag {
    fn from(m: tag::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TagWithCount {
    #[serde(flatten)]
    pub tag: Tag,
    pub service_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    pub id: i32,
    pub title: String,
    pub url: String,
    pub image_url: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<banner::Model> for Banner {
    fn from(m: banner::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            url: m.url,
            image_url: m.image_url,
            description: m.description,
            is_active: m.is_active,
            sort_order: m.sort_order,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// 分类及其热门服务、常用标签（首页区块）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CategorySection {
    #[serde(flatten)]
    pub category: Category,
    pub services: Vec<Service>,
    pub top_tags: Vec<TagWithCount>,
}

/// 分类详情页
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPage {
    pub category: Category,
    pub services: Vec<ServiceDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current: u64,
    pub page_size: u64,
    pub total: u64,
}

/// 管理端标签分页
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TagListPage {
    pub data: Vec<TagWithCount>,
    pub pagination: Pagination,
}

/// 标签详情页（公开）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TagServicesPage {
    pub tag: Tag,
    pub services: Vec<ServiceDetail>,
    pub total_count: u64,
    pub total_pages: u64,
    pub page: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SiteStats {
    pub service_count: u64,
    pub category_count: u64,
    pub tag_count: u64,
    pub total_clicks: i64,
}

// ============ 排序 ============

/// 管理端标签列表按服务数排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagSortOrder {
    #[default]
    Descend,
    Ascend,
}

impl TagSortOrder {
    /// 非法值回退为默认的 descend
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("ascend") => TagSortOrder::Ascend,
            _ => TagSortOrder::Descend,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TagSortOrder::Descend => "descend",
            TagSortOrder::Ascend => "ascend",
        }
    }
}

/// 标签页服务排序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagServiceSort {
    #[default]
    Clicks,
    CreatedAt,
}

impl TagServiceSort {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("createdAt") => TagServiceSort::CreatedAt,
            _ => TagServiceSort::Clicks,
        }
    }
}

// ============ 输入 ============

/// 分类创建/更新输入，更新时 None 表示不修改
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub sort_order: Option<i32>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub seo_keywords: Option<String>,
}

impl CategoryInput {
    pub fn validate_create(&self) -> Result<()> {
        require_text(self.name.as_deref(), "Category name is required")?;
        let slug = require_text(self.slug.as_deref(), "Category slug is required")?;
        validate_slug(slug)
    }

    pub fn validate_update(&self) -> Result<()> {
        if let Some(name) = self.name.as_deref()
            && name.trim().is_empty()
        {
            return Err(AinavError::validation("Category name cannot be empty"));
        }
        if let Some(slug) = self.slug.as_deref() {
            validate_slug(slug.trim())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInput {
    pub name: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub category_id: Option<i32>,
    pub tag_ids: Option<Vec<i32>>,
}

impl ServiceInput {
    pub fn validate_create(&self) -> Result<()> {
        require_text(self.name.as_deref(), "Service name is required")?;
        let url = require_text(self.url.as_deref(), "Service url is required")?;
        validate_url(url)?;
        require_text(
            self.description.as_deref(),
            "Service description is required",
        )?;
        if self.category_id.is_none() {
            return Err(AinavError::validation("Service category is required"));
        }
        Ok(())
    }

    pub fn validate_update(&self) -> Result<()> {
        if let Some(name) = self.name.as_deref()
            && name.trim().is_empty()
        {
            return Err(AinavError::validation("Service name cannot be empty"));
        }
        if let Some(url) = self.url.as_deref() {
            validate_url(url.trim())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerInput {
    pub title: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

impl BannerInput {
    pub fn validate_create(&self) -> Result<()> {
        require_text(self.title.as_deref(), "Banner title is required")?;
        require_text(self.url.as_deref(), "Banner url is required")?;
        require_text(self.image_url.as_deref(), "Banner image is required")?;
        Ok(())
    }
}

/// 批量排序中的一项
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SortOrderUpdate {
    pub id: i32,
    pub sort_order: i32,
}

// ============ 校验工具 ============

/// 非空校验，返回去除首尾空白后的值
pub fn require_text<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AinavError::validation(message)),
    }
}

/// slug 只允许字母、数字、`-` 和 `_`
pub fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() {
        return Err(AinavError::validation("Category slug is required"));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AinavError::validation(
            "Category slug may only contain letters, digits, '-' and '_'",
        ));
    }
    Ok(())
}

/// 服务地址必须是 http(s) 绝对 URL
pub fn validate_url(raw: &str) -> Result<()> {
    match url::Url::parse(raw) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        Ok(parsed) => Err(AinavError::validation(format!(
            "Unsupported url scheme: {}",
            parsed.scheme()
        ))),
        Err(_) => Err(AinavError::validation(format!("Invalid url: {}", raw))),
    }
}

/// 可选文本字段：空白字符串视为清空
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("image-generation").is_ok());
        assert!(validate_slug("dev_tools2").is_ok());
        assert!(validate_slug("").is_err());
        assert!(validate_slug("has space").is_err());
        assert!(validate_slug("中文").is_err());
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://openai.com").is_ok());
        assert!(validate_url("http://localhost:3000/x").is_ok());
        assert!(validate_url("ftp://example.com").is_err());
        assert!(validate_url("not a url").is_err());
    }

    #[test]
    fn test_service_input_requires_fields() {
        let input = ServiceInput {
            name: Some("ChatGPT".into()),
            url: Some("https://chat.openai.com".into()),
            description: Some("   ".into()),
            category_id: Some(1),
            ..Default::default()
        };
        assert!(input.validate_create().is_err());

        let input = ServiceInput {
            description: Some("Chatbot".into()),
            ..input
        };
        assert!(input.validate_create().is_ok());
    }

    #[test]
    fn test_sort_order_parse_defaults_to_descend() {
        assert_eq!(TagSortOrder::parse(None), TagSortOrder::Descend);
        assert_eq!(TagSortOrder::parse(Some("ascend")), TagSortOrder::Ascend);
        assert_eq!(TagSortOrder::parse(Some("bogus")), TagSortOrder::Descend);
        assert_eq!(TagServiceSort::parse(Some("createdAt")), TagServiceSort::CreatedAt);
        assert_eq!(TagServiceSort::parse(Some("clicks")), TagServiceSort::Clicks);
    }

    #[test]
    fn test_normalize_optional() {
        assert_eq!(normalize_optional(Some("  ".into())), None);
        assert_eq!(normalize_optional(Some(" x ".into())), Some("x".into()));
        assert_eq!(normalize_optional(None), None);
    }

    #[test]
    fn test_tag_with_count_flattens() {
        let now = Utc::now();
        let value = serde_json::to_value(TagWithCount {
            tag: Tag {
                id: 1,
                name: "llm".into(),
                created_at: now,
                updated_at: now,
            },
            service_count: 3,
        })
        .unwrap();
        assert_eq!(value["name"], "llm");
        assert_eq!(value["serviceCount"], 3);
        assert!(value.get("tag").is_none());
    }
}
