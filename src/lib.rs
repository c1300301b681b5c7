//! ainav - AI 服务导航站
//!
//! 公开目录（分类、标签、热门、实时搜索）加单管理员后台。
//!
//! # Features
//! - **server**: HTTP server mode (default)
//! - **cli**: Maintenance commands (init, reset-password, config generate)
//!
//! # Architecture
//! - `api`: HTTP routes, session handling and middleware
//! - `cache`: Object cache backends (redis / memory / null) and read-through
//! - `config`: Static configuration (TOML + env)
//! - `services`: Business logic shared by handlers and CLI
//! - `storage`: SeaORM storage and models
//! - `runtime`: Startup, shutdown and execution modes
//! - `system`: Logging

pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
