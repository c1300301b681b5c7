//! 公开目录：首页分类区块、分类页、热门服务、标签页、站点设置

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::errors::{AinavError, Result};
use crate::storage::{
    CategoryPage, CategorySection, SeaOrmStorage, Service, ServiceDetail, TagServiceSort,
    TagServicesPage,
};

/// 首页每个分类展示的服务数
pub const SECTION_SERVICE_LIMIT: u64 = 12;
/// 首页每个分类展示的标签数
pub const SECTION_TAG_LIMIT: u64 = 5;
pub const POPULAR_LIMIT: u64 = 12;
pub const TAG_PAGE_SIZE: u64 = 24;

/// 未配置时的站点设置默认值
pub const DEFAULT_SETTINGS: [(&str, &str); 6] = [
    ("siteName", "AI导航"),
    ("siteDescription", "收录优质AI服务和应用的导航网站"),
    ("statisticsCode", ""),
    ("seoTitle", ""),
    ("seoKeywords", ""),
    ("seoDescription", ""),
];

pub struct CatalogService {
    storage: Arc<SeaOrmStorage>,
}

impl CatalogService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn category_sections(&self) -> Result<Vec<CategorySection>> {
        let categories = self.storage.list_categories().await?;
        let mut sections = Vec::with_capacity(categories.len());

        for category in categories {
            let services = self
                .storage
                .services_in_category(category.id, Some(SECTION_SERVICE_LIMIT))
                .await?
                .into_iter()
                .map(Service::from)
                .collect();
            let top_tags = self
                .storage
                .top_tags_for_category(category.id, SECTION_TAG_LIMIT)
                .await?;

            sections.push(CategorySection {
                category,
                services,
                top_tags,
            });
        }
        Ok(sections)
    }

    pub async fn category_page(&self, slug: &str) -> Result<CategoryPage> {
        let category = self
            .storage
            .get_category_by_slug(slug)
            .await?
            .ok_or_else(|| AinavError::not_found("Category not found"))?;

        let models = self.storage.services_in_category(category.id, None).await?;
        let services = self.storage.attach_details(models).await?;
        Ok(CategoryPage { category, services })
    }

    pub async fn popular_services(&self) -> Result<Vec<ServiceDetail>> {
        self.storage.popular_services(POPULAR_LIMIT).await
    }

    pub async fn tag_page(
        &self,
        name: &str,
        page: u64,
        sort: TagServiceSort,
    ) -> Result<TagServicesPage> {
        let tag = self
            .storage
            .get_tag_by_name(name)
            .await?
            .ok_or_else(|| AinavError::not_found("Tag not found"))?;

        let page = page.max(1);
        let (services, total_count) = self
            .storage
            .services_for_tag(tag.id, page, TAG_PAGE_SIZE, sort)
            .await?;

        Ok(TagServicesPage {
            tag,
            services,
            total_count,
            total_pages: total_count.div_ceil(TAG_PAGE_SIZE),
            page,
        })
    }

    /// 数据库中的设置覆盖默认值；空字符串同样回退为默认值
    pub async fn site_settings(&self) -> Result<BTreeMap<String, String>> {
        let stored = self.storage.get_settings().await?;
        Ok(merge_with_defaults(stored))
    }
}

pub fn merge_with_defaults(stored: BTreeMap<String, String>) -> BTreeMap<String, String> {
    let mut merged: BTreeMap<String, String> = DEFAULT_SETTINGS
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    for (key, value) in stored {
        if value.is_empty() && merged.contains_key(&key) {
            continue;
        }
        merged.insert(key, value);
    }
    merged
}
