//! API 模块常量定义

/// 管理员会话 Cookie 名称
pub const SESSION_COOKIE_NAME: &str = "admin_token";

/// 未登录访问后台页面时的跳转目标
pub const ADMIN_LOGIN_PATH: &str = "/admin/login";

/// 登录失败统一提示（不区分用户不存在与密码错误）
pub const LOGIN_FAILED_MESSAGE: &str = "Username or password incorrect";
