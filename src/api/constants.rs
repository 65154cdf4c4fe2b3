//! API 模块常量定义

/// Session Token Cookie 名称
pub const SESSION_COOKIE_NAME: &str = "tinylink_session";

/// 登录后的落地页
pub const LINKS_PATH: &str = "/urls";

/// 未登录时的落地页
pub const LOGIN_PATH: &str = "/login";

/// 公开跳转路由前缀
pub const REDIRECT_PREFIX: &str = "/u";
