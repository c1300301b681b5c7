//! API 响应帮助函数

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::{CACHE_CONTROL, HeaderValue};
use serde::Serialize;

use crate::errors::AinavError;

use super::types::ApiResponse;

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    success: bool,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            success,
            message: message.into(),
            data,
        })
}

/// 构建成功响应
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, true, "OK", Some(data))
}

/// 带提示文案的成功响应
pub fn success_with_message<T: Serialize>(message: &str, data: T) -> HttpResponse {
    json_response(StatusCode::OK, true, message, Some(data))
}

/// 构建错误响应
pub fn error_response(status: StatusCode, message: &str) -> HttpResponse {
    json_response::<()>(status, false, message, None)
}

/// 从 AinavError 构建错误响应
pub fn error_from_ainav(err: &AinavError) -> HttpResponse {
    error_response(err.http_status(), err.public_message())
}

/// 公开列表不做缓存，响应附带 no-store
pub fn no_store(mut response: HttpResponse) -> HttpResponse {
    response
        .headers_mut()
        .insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}
