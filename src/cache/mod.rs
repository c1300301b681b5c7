//! JSON 对象缓存
//!
//! - `object_cache`: redis / memory / null 三种后端
//! - `read_through`: 读穿透 + 命中统计
//! - `keys`: 缓存键与 TTL

pub mod keys;
pub mod object_cache;
pub mod read_through;
pub mod traits;

pub use object_cache::{CacheKind, create_object_cache};
pub use read_through::{CacheStats, read_through};
pub use traits::{CacheResult, ObjectCache};
