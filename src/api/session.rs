//! 管理员会话
//!
//! 会话令牌是 HS256 签名的 JWT，存放在 HttpOnly Cookie 中，服务端不保存状态。
//! 校验分两层：
//! - `shape_check`：只验签名和过期时间，不访问数据库，页面网关使用
//! - 完整校验：在 `shape_check` 之后再查库确认管理员存在，见 `AdminSession` 提取器

use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::api::constants::SESSION_COOKIE_NAME;
use crate::config::AuthConfig;
use crate::errors::Result;
use crate::utils::generate_secure_token;

/// 会话 Claims
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// 管理员 id
    pub aid: i32,
    /// 签发时间（毫秒）
    pub iat_ms: i64,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

pub struct SessionManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    session_days: u64,
    cookie_secure: bool,
}

impl SessionManager {
    pub fn new(secret: &str, session_days: u64, cookie_secure: bool) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            session_days,
            cookie_secure,
        }
    }

    /// 按配置创建；密钥为空时随机生成（进程重启后旧会话失效）
    pub fn from_config(config: &AuthConfig) -> Self {
        let secret = if config.session_secret.is_empty() {
            warn!("auth.session_secret not configured, generating a random secret; sessions will not survive restarts");
            generate_secure_token(32)
        } else {
            config.session_secret.clone()
        };

        Self::new(&secret, config.session_days, config.cookie_secure)
    }

    pub fn session_days(&self) -> u64 {
        self.session_days
    }

    /// 为管理员签发会话令牌
    pub fn issue(&self, admin_id: i32) -> Result<String> {
        let now = Utc::now();
        let claims = SessionClaims {
            aid: admin_id,
            iat_ms: now.timestamp_millis(),
            iat: now.timestamp(),
            exp: (now + Duration::days(self.session_days as i64)).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    /// 验证签名与过期时间，返回管理员 id
    pub fn shape_check(&self, token: &str) -> Option<i32> {
        match decode::<SessionClaims>(token, &self.decoding_key, &Validation::default()) {
            Ok(data) if data.claims.aid > 0 => Some(data.claims.aid),
            Ok(data) => {
                trace!("Session token rejected: invalid admin id {}", data.claims.aid);
                None
            }
            Err(e) => {
                trace!("Session token rejected: {}", e);
                None
            }
        }
    }

    fn cookie_base(&self, value: String, max_age: CookieDuration) -> Cookie<'static> {
        let mut cookie = Cookie::new(SESSION_COOKIE_NAME, value);
        cookie.set_path("/");
        cookie.set_http_only(true);
        cookie.set_secure(self.cookie_secure);
        cookie.set_same_site(SameSite::Strict);
        cookie.set_max_age(max_age);
        cookie
    }

    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        self.cookie_base(token, CookieDuration::days(self.session_days as i64))
    }

    /// 立即过期的会话 Cookie（登出）
    pub fn cleared_cookie(&self) -> Cookie<'static> {
        self.cookie_base(String::new(), CookieDuration::ZERO)
    }
}
