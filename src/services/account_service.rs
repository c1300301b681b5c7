//! 管理员登录与账户维护

use std::sync::OnceLock;

use tracing::{info, warn};

use crate::api::constants::LOGIN_FAILED_MESSAGE;
use crate::errors::{AinavError, Result};
use crate::storage::{AdminAccount, SeaOrmStorage};
use crate::utils::password::{hash_password, validate_new_password, verify_password};

/// 用户不存在时参与校验的占位哈希，首次使用时生成
fn dummy_hash() -> Result<&'static str> {
    static DUMMY_HASH: OnceLock<String> = OnceLock::new();
    if let Some(hash) = DUMMY_HASH.get() {
        return Ok(hash);
    }
    let hash = hash_password("ainav-unknown-admin")?;
    Ok(DUMMY_HASH.get_or_init(|| hash))
}

/// 校验用户名密码
///
/// 用户不存在与密码错误返回同一条错误信息。
pub async fn authenticate(
    storage: &SeaOrmStorage,
    username: &str,
    password: &str,
) -> Result<AdminAccount> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(AinavError::validation("Username and password are required"));
    }

    let Some(admin) = storage.find_admin_by_username(username).await? else {
        // 用户不存在时也做一次完整的哈希校验，响应耗时与密码错误一致
        let _ = verify_password(password, dummy_hash()?);
        warn!("Login failed: unknown username");
        return Err(AinavError::validation(LOGIN_FAILED_MESSAGE));
    };

    if !verify_password(password, &admin.password)? {
        warn!("Login failed: wrong password for admin {}", admin.id);
        return Err(AinavError::validation(LOGIN_FAILED_MESSAGE));
    }

    info!("Admin {} logged in", admin.id);
    Ok(admin.into())
}

/// 修改密码，需要提供旧密码
pub async fn change_password(
    storage: &SeaOrmStorage,
    admin_id: i32,
    old_password: &str,
    new_password: &str,
) -> Result<()> {
    if old_password.is_empty() || new_password.is_empty() {
        return Err(AinavError::validation(
            "Old password and new password are required",
        ));
    }
    validate_new_password(new_password)?;

    let admin = storage
        .find_admin(admin_id)
        .await?
        .ok_or_else(|| AinavError::not_found("Admin not found"))?;

    if !verify_password(old_password, &admin.password)? {
        return Err(AinavError::validation("Old password is incorrect"));
    }

    let hash = hash_password(new_password)?;
    storage.update_admin_password(admin_id, &hash).await?;
    info!("Admin {} changed password", admin_id);
    Ok(())
}

/// 不校验旧密码直接重置（命令行使用）
pub async fn reset_password(
    storage: &SeaOrmStorage,
    username: &str,
    new_password: &str,
) -> Result<AdminAccount> {
    validate_new_password(new_password)?;

    let admin = storage
        .find_admin_by_username(username.trim())
        .await?
        .ok_or_else(|| AinavError::not_found(format!("Admin '{}' not found", username.trim())))?;

    let hash = hash_password(new_password)?;
    storage.update_admin_password(admin.id, &hash).await?;
    info!("Password reset for admin {}", admin.id);
    Ok(admin.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::password::is_argon2_hash;

    #[test]
    fn test_dummy_hash_is_stable_and_never_matches() {
        let first = dummy_hash().unwrap();
        assert!(is_argon2_hash(first));
        assert_eq!(first, dummy_hash().unwrap());
        assert!(!verify_password("admin123", first).unwrap());
    }
}
