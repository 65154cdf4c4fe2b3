//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::TinylinkError;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字，按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 2000-2099: 认证错误
/// - 3000-3099: 链接错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    NotFound = 1004,
    InternalServerError = 1005,

    // 认证错误 2000-2099
    AuthFailed = 2000,
    TokenInvalid = 2002,
    EmailRequired = 2010,
    PasswordRequired = 2011,
    EmailTaken = 2012,
    PasswordHashError = 2013,

    // 链接错误 3000-3099
    LinkNotFound = 3000,
    LinkInvalidUrl = 3002,
    LinkNotOwner = 3007,
    CodeSpaceExhausted = 3008,
}

impl From<&TinylinkError> for ErrorCode {
    fn from(err: &TinylinkError) -> Self {
        match err {
            TinylinkError::NotFound(_) => ErrorCode::LinkNotFound,
            TinylinkError::Unauthenticated(_) => ErrorCode::Unauthorized,
            TinylinkError::Forbidden(_) => ErrorCode::LinkNotOwner,
            TinylinkError::EmailBlank(_) => ErrorCode::EmailRequired,
            TinylinkError::SecretBlank(_) => ErrorCode::PasswordRequired,
            TinylinkError::EmailTaken(_) => ErrorCode::EmailTaken,
            TinylinkError::LoginFailed(_) => ErrorCode::AuthFailed,
            TinylinkError::Validation(_) => ErrorCode::LinkInvalidUrl,
            TinylinkError::CodeSpaceExhausted(_) => ErrorCode::CodeSpaceExhausted,
            TinylinkError::PasswordHash(_) => ErrorCode::PasswordHashError,
            TinylinkError::Token(_) => ErrorCode::TokenInvalid,
            TinylinkError::Config(_) => ErrorCode::InternalServerError,
        }
    }
}
