//! Admin API 服务模块
//!
//! 该模块包含后台管理的所有端点：
//! - 认证（登录、登出）
//! - 分类、服务、标签、头图 CRUD
//! - 站点设置、图片上传
//! - 账户与统计

mod account;
pub mod auth;
mod banners;
mod categories;
mod dashboard;
pub mod guard;
mod helpers;
pub mod routes;
mod services;
mod settings;
mod tags;
mod types;
mod upload;

pub use types::*;

pub use helpers::{
    error_from_ainav, error_response, json_response, no_store, success_response,
    success_with_message,
};

pub use guard::AdminSession;

pub use auth::{login, login_rate_limiter, logout};
