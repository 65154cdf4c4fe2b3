//! API 类型定义

use serde::{Deserialize, Serialize};

use crate::api::constants;
use crate::domain::{Account, Link};
use crate::services::{LinkDetails, Session};

/// 统一响应信封
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
}

/// 注册 / 登录请求体
///
/// 缺失字段按空字符串处理，交给身份层给出具体错误
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// 创建 / 更新链接请求体
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct LinkTargetRequest {
    #[serde(default, alias = "longURL")]
    pub target: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AccountResponse {
    pub id: String,
    pub email: String,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id.to_string(),
            email: account.email,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AuthSuccessResponse {
    pub account: AccountResponse,
    pub token: String,
    /// 秒
    pub expires_in: u64,
}

impl AuthSuccessResponse {
    pub fn new(session: Session, session_minutes: u64) -> Self {
        Self {
            account: AccountResponse::from(session.account),
            token: session.token,
            expires_in: session_minutes * 60,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LinkResponse {
    pub code: String,
    pub target: String,
    pub owner_id: String,
    pub created_at: String,
    pub short_path: String,
    pub total_visits: u64,
    pub unique_origins: usize,
}

impl From<LinkDetails> for LinkResponse {
    fn from(details: LinkDetails) -> Self {
        let LinkDetails { link, stats } = details;
        Self {
            short_path: format!("{}/{}", constants::REDIRECT_PREFIX, link.code),
            code: link.code,
            target: link.target,
            owner_id: link.owner_id.to_string(),
            created_at: link.created_at.to_rfc3339(),
            total_visits: stats.total_visits,
            unique_origins: stats.unique_origins,
        }
    }
}

impl From<Link> for LinkResponse {
    fn from(link: Link) -> Self {
        LinkResponse::from(LinkDetails::from(link))
    }
}

/// 删除结果
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DeleteResponse {
    pub code: String,
}

/// 健康检查响应
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub started_at: String,
    pub uptime: u64,
    pub links_count: usize,
    pub accounts_count: usize,
    pub response_time_ms: u32,
}
