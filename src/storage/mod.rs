//! Storage layer
//!
//! `SeaOrmStorage` owns the process-wide connection pool; every query and
//! mutation used by the HTTP handlers lives in `backend/`.

pub mod backend;
pub mod models;

pub use backend::{SeaOrmStorage, infer_backend_from_url};
pub use models::*;
