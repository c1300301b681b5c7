//! 当前管理员账户

use std::sync::Arc;

use actix_web::{Responder, Result as ActixResult, web};

use crate::services::account_service;
use crate::storage::SeaOrmStorage;

use super::guard::AdminSession;
use super::helpers::{success_response, success_with_message};
use super::types::PasswordChange;

pub async fn get_account(session: AdminSession) -> ActixResult<impl Responder> {
    Ok(success_response(session.admin))
}

pub async fn change_password(
    session: AdminSession,
    body: web::Json<PasswordChange>,
    storage: web::Data<Arc<SeaOrmStorage>>,
) -> ActixResult<impl Responder> {
    let body = body.into_inner();
    account_service::change_password(
        &storage,
        session.id(),
        body.old_password.as_deref().unwrap_or_default(),
        body.new_password.as_deref().unwrap_or_default(),
    )
    .await?;

    Ok(success_with_message::<Option<()>>("Password updated", None))
}
