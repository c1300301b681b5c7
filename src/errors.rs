use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use tracing::error;

/// 对外统一的 500 文案，内部细节只写日志
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Clone)]
pub enum AinavError {
    Validation(String),
    Unauthorized(String),
    NotFound(String),
    Conflict(String),
    FileTooLarge(String),
    UnsupportedMedia(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    CacheConnection(String),
    FileOperation(String),
    Serialization(String),
    PasswordHash(String),
    Token(String),
}

impl AinavError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            AinavError::Validation(_) => "E001",
            AinavError::Unauthorized(_) => "E002",
            AinavError::NotFound(_) => "E003",
            AinavError::Conflict(_) => "E004",
            AinavError::FileTooLarge(_) => "E005",
            AinavError::UnsupportedMedia(_) => "E006",
            AinavError::DatabaseConfig(_) => "E007",
            AinavError::DatabaseConnection(_) => "E008",
            AinavError::DatabaseOperation(_) => "E009",
            AinavError::CacheConnection(_) => "E010",
            AinavError::FileOperation(_) => "E011",
            AinavError::Serialization(_) => "E012",
            AinavError::PasswordHash(_) => "E013",
            AinavError::Token(_) => "E014",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            AinavError::Validation(_) => "Validation Error",
            AinavError::Unauthorized(_) => "Unauthorized",
            AinavError::NotFound(_) => "Resource Not Found",
            AinavError::Conflict(_) => "Conflict",
            AinavError::FileTooLarge(_) => "File Too Large",
            AinavError::UnsupportedMedia(_) => "Unsupported Media Type",
            AinavError::DatabaseConfig(_) => "Database Configuration Error",
            AinavError::DatabaseConnection(_) => "Database Connection Error",
            AinavError::DatabaseOperation(_) => "Database Operation Error",
            AinavError::CacheConnection(_) => "Cache Connection Error",
            AinavError::FileOperation(_) => "File Operation Error",
            AinavError::Serialization(_) => "Serialization Error",
            AinavError::PasswordHash(_) => "Password Hash Error",
            AinavError::Token(_) => "Token Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            AinavError::Validation(msg)
            | AinavError::Unauthorized(msg)
            | AinavError::NotFound(msg)
            | AinavError::Conflict(msg)
            | AinavError::FileTooLarge(msg)
            | AinavError::UnsupportedMedia(msg)
            | AinavError::DatabaseConfig(msg)
            | AinavError::DatabaseConnection(msg)
            | AinavError::DatabaseOperation(msg)
            | AinavError::CacheConnection(msg)
            | AinavError::FileOperation(msg)
            | AinavError::Serialization(msg)
            | AinavError::PasswordHash(msg)
            | AinavError::Token(msg) => msg,
        }
    }

    /// 映射到 HTTP 状态码
    ///
    /// 只有调用方能修正的错误才暴露具体状态，其余一律 500。
    pub fn http_status(&self) -> StatusCode {
        match self {
            AinavError::Validation(_)
            | AinavError::FileTooLarge(_)
            | AinavError::UnsupportedMedia(_) => StatusCode::BAD_REQUEST,
            AinavError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AinavError::NotFound(_) => StatusCode::NOT_FOUND,
            AinavError::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 返回给客户端的文案（500 类错误不泄露内部信息）
    pub fn public_message(&self) -> &str {
        if self.http_status() == StatusCode::INTERNAL_SERVER_ERROR {
            INTERNAL_ERROR_MESSAGE
        } else {
            self.message()
        }
    }

    /// 格式化为彩色输出（用于 CLI）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for AinavError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for AinavError {}

impl ResponseError for AinavError {
    fn status_code(&self) -> StatusCode {
        self.http_status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.http_status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("{} {}", self.code(), self.format_simple());
        }
        HttpResponse::build(status).json(serde_json::json!({
            "success": false,
            "message": self.public_message(),
            "data": null,
        }))
    }
}

// 便捷的构造函数
impl AinavError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        AinavError::Validation(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        AinavError::Unauthorized(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        AinavError::NotFound(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        AinavError::Conflict(msg.into())
    }

    pub fn file_too_large<T: Into<String>>(msg: T) -> Self {
        AinavError::FileTooLarge(msg.into())
    }

    pub fn unsupported_media<T: Into<String>>(msg: T) -> Self {
        AinavError::UnsupportedMedia(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        AinavError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        AinavError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        AinavError::DatabaseOperation(msg.into())
    }

    pub fn cache_connection<T: Into<String>>(msg: T) -> Self {
        AinavError::CacheConnection(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        AinavError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        AinavError::Serialization(msg.into())
    }

    pub fn password_hash<T: Into<String>>(msg: T) -> Self {
        AinavError::PasswordHash(msg.into())
    }

    pub fn token<T: Into<String>>(msg: T) -> Self {
        AinavError::Token(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for AinavError {
    fn from(err: sea_orm::DbErr) -> Self {
        AinavError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for AinavError {
    fn from(err: std::io::Error) -> Self {
        AinavError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for AinavError {
    fn from(err: serde_json::Error) -> Self {
        AinavError::Serialization(err.to_string())
    }
}

impl From<redis::RedisError> for AinavError {
    fn from(err: redis::RedisError) -> Self {
        AinavError::CacheConnection(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AinavError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        AinavError::Token(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AinavError>;
