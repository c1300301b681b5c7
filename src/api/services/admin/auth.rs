//! 登录与登出

use std::sync::Arc;

use actix_governor::{Governor, GovernorConfigBuilder, KeyExtractor, SimpleKeyExtractionError};
use actix_web::dev::ServiceRequest;
use actix_web::{HttpResponse, Responder, Result as ActixResult, web};
use governor::middleware::NoOpMiddleware;
use tracing::{debug, info};

use crate::api::session::SessionManager;
use crate::services::account_service;
use crate::storage::SeaOrmStorage;

use super::types::{ApiResponse, LoginCredentials, LoginResponse};

/// 登录限流 key：TCP 连接 IP，无法被请求头伪造
#[derive(Clone, Copy)]
pub struct LoginKeyExtractor;

impl KeyExtractor for LoginKeyExtractor {
    type Key = String;
    type KeyExtractionError = SimpleKeyExtractionError<&'static str>;

    fn extract(&self, req: &ServiceRequest) -> Result<Self::Key, Self::KeyExtractionError> {
        req.peer_addr()
            .map(|addr| addr.ip().to_string())
            .ok_or_else(|| SimpleKeyExtractionError::new("Unable to extract peer IP"))
    }
}

/// 登录限流器：每秒补充 1 个令牌，突发最多 5 次，超限返回 429
pub fn login_rate_limiter() -> Governor<LoginKeyExtractor, NoOpMiddleware> {
    let config = GovernorConfigBuilder::default()
        .seconds_per_request(1)
        .burst_size(5)
        .key_extractor(LoginKeyExtractor)
        .finish()
        .expect("Invalid rate limit config");

    debug!("Login rate limiter created: 1 req/s, burst 5");
    Governor::new(&config)
}

pub async fn login(
    body: web::Json<LoginCredentials>,
    storage: web::Data<Arc<SeaOrmStorage>>,
    sessions: web::Data<Arc<SessionManager>>,
) -> ActixResult<impl Responder> {
    let credentials = body.into_inner();
    let admin = account_service::authenticate(
        &storage,
        credentials.username.as_deref().unwrap_or_default(),
        credentials.password.as_deref().unwrap_or_default(),
    )
    .await?;

    let token = sessions.issue(admin.id)?;

    Ok(HttpResponse::Ok()
        .cookie(sessions.session_cookie(token))
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            success: true,
            message: "Login successful".to_string(),
            data: Some(LoginResponse {
                id: admin.id,
                username: admin.username,
            }),
        }))
}

/// 登出：下发立即过期的 Cookie，不要求已登录
pub async fn logout(sessions: web::Data<Arc<SessionManager>>) -> ActixResult<impl Responder> {
    info!("Admin logout");

    Ok(HttpResponse::Ok()
        .cookie(sessions.cleared_cookie())
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse::<()> {
            success: true,
            message: "Logout successful".to_string(),
            data: None,
        }))
}
