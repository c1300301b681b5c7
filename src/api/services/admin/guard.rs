//! 管理员会话完整校验
//!
//! 每个管理端 handler 都以 `AdminSession` 作为参数：先验证 Cookie 中的令牌，
//! 再确认管理员仍存在于数据库中。任一步失败都返回 401。

use std::sync::Arc;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::LocalBoxFuture;
use tracing::{error, trace};

use crate::api::constants::SESSION_COOKIE_NAME;
use crate::api::session::SessionManager;
use crate::errors::AinavError;
use crate::storage::{AdminAccount, SeaOrmStorage};

const UNAUTHORIZED_MESSAGE: &str = "Unauthorized, please log in";

/// 已通过完整校验的管理员
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub admin: AdminAccount,
}

impl AdminSession {
    pub fn id(&self) -> i32 {
        self.admin.id
    }
}

impl FromRequest for AdminSession {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = req
            .cookie(SESSION_COOKIE_NAME)
            .map(|c| c.value().to_string());
        let sessions = req.app_data::<web::Data<Arc<SessionManager>>>().cloned();
        let storage = req.app_data::<web::Data<Arc<SeaOrmStorage>>>().cloned();

        Box::pin(async move {
            let (Some(sessions), Some(storage)) = (sessions, storage) else {
                error!("AdminSession: session manager or storage not registered as app data");
                return Err(AinavError::token("Session state not configured").into());
            };

            let Some(admin_id) = token.as_deref().and_then(|t| sessions.shape_check(t)) else {
                trace!("AdminSession: missing or invalid session cookie");
                return Err(AinavError::unauthorized(UNAUTHORIZED_MESSAGE).into());
            };

            match storage.find_admin(admin_id).await? {
                Some(admin) => Ok(AdminSession {
                    admin: admin.into(),
                }),
                None => {
                    trace!("AdminSession: admin {} no longer exists", admin_id);
                    Err(AinavError::unauthorized(UNAUTHORIZED_MESSAGE).into())
                }
            }
        })
    }
}
