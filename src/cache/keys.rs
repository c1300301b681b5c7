//! 缓存键与 TTL
//!
//! 键由操作名和全部参数拼成，后端再加上自己的前缀。

use std::time::Duration;

use crate::storage::TagSortOrder;

/// 管理端标签分页缓存前缀，标签写操作按此前缀整体失效
pub const ADMIN_TAGS_PREFIX: &str = "admin:tags:";
pub const ADMIN_TAGS_TTL: Duration = Duration::from_secs(30);

pub const LIVE_SEARCH_PREFIX: &str = "live-search:";
pub const LIVE_SEARCH_TTL: Duration = Duration::from_secs(60);

pub fn admin_tags_key(page: u64, page_size: u64, order: TagSortOrder) -> String {
    format!(
        "{}{}:{}:{}",
        ADMIN_TAGS_PREFIX,
        page,
        page_size,
        order.as_str()
    )
}

/// 调用方负责 trim
pub fn live_search_key(query: &str) -> String {
    format!("{}{}", LIVE_SEARCH_PREFIX, query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_deterministic() {
        assert_eq!(
            admin_tags_key(1, 10, TagSortOrder::Descend),
            "admin:tags:1:10:descend"
        );
        assert_eq!(
            admin_tags_key(3, 20, TagSortOrder::Ascend),
            "admin:tags:3:20:ascend"
        );
        assert!(admin_tags_key(1, 10, TagSortOrder::Ascend).starts_with(ADMIN_TAGS_PREFIX));
        assert_eq!(live_search_key("gpt"), "live-search:gpt");
    }
}
