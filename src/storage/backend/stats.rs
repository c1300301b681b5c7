use super::SeaOrmStorage;
use crate::errors::Result;
use crate::storage::models::SiteStats;

impl SeaOrmStorage {
    /// 后台仪表盘统计
    pub async fn site_stats(&self) -> Result<SiteStats> {
        Ok(SiteStats {
            service_count: self.count_services().await?,
            category_count: self.count_categories().await?,
            tag_count: self.count_tags().await?,
            total_clicks: self.total_clicks().await?,
        })
    }
}
