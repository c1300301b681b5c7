//! Service layer for business logic
//!
//! 供 HTTP handler 与 CLI 共用的业务逻辑。

pub mod account_service;
pub mod bootstrap;
mod catalog_service;
mod search_service;
mod tag_service;
mod upload_service;

pub use bootstrap::{BootstrapReport, initialize_system};
pub use catalog_service::*;
pub use search_service::*;
pub use tag_service::*;
pub use upload_service::*;
