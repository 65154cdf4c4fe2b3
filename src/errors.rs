use std::fmt;

use actix_web::http::StatusCode;

use crate::domain::{CredentialError, RegisterError, RegistryError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TinylinkError {
    NotFound(String),
    Unauthenticated(String),
    Forbidden(String),
    EmailBlank(String),
    SecretBlank(String),
    EmailTaken(String),
    LoginFailed(String),
    Validation(String),
    CodeSpaceExhausted(String),
    PasswordHash(String),
    Token(String),
    Config(String),
}

impl TinylinkError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            TinylinkError::NotFound(_) => "E001",
            TinylinkError::Unauthenticated(_) => "E002",
            TinylinkError::Forbidden(_) => "E003",
            TinylinkError::EmailBlank(_) => "E004",
            TinylinkError::SecretBlank(_) => "E005",
            TinylinkError::EmailTaken(_) => "E006",
            TinylinkError::LoginFailed(_) => "E007",
            TinylinkError::Validation(_) => "E008",
            TinylinkError::CodeSpaceExhausted(_) => "E009",
            TinylinkError::PasswordHash(_) => "E010",
            TinylinkError::Token(_) => "E011",
            TinylinkError::Config(_) => "E012",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            TinylinkError::NotFound(_) => "Resource Not Found",
            TinylinkError::Unauthenticated(_) => "Unauthenticated",
            TinylinkError::Forbidden(_) => "Forbidden",
            TinylinkError::EmailBlank(_) => "Email Required",
            TinylinkError::SecretBlank(_) => "Password Required",
            TinylinkError::EmailTaken(_) => "Email Already Registered",
            TinylinkError::LoginFailed(_) => "Login Failed",
            TinylinkError::Validation(_) => "Validation Error",
            TinylinkError::CodeSpaceExhausted(_) => "Short Code Space Exhausted",
            TinylinkError::PasswordHash(_) => "Password Hash Error",
            TinylinkError::Token(_) => "Session Token Error",
            TinylinkError::Config(_) => "Configuration Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            TinylinkError::NotFound(msg)
            | TinylinkError::Unauthenticated(msg)
            | TinylinkError::Forbidden(msg)
            | TinylinkError::EmailBlank(msg)
            | TinylinkError::SecretBlank(msg)
            | TinylinkError::EmailTaken(msg)
            | TinylinkError::LoginFailed(msg)
            | TinylinkError::Validation(msg)
            | TinylinkError::CodeSpaceExhausted(msg)
            | TinylinkError::PasswordHash(msg)
            | TinylinkError::Token(msg)
            | TinylinkError::Config(msg) => msg,
        }
    }

    /// HTTP status the boundary layer should answer with
    pub fn http_status(&self) -> StatusCode {
        match self {
            TinylinkError::NotFound(_) => StatusCode::NOT_FOUND,
            TinylinkError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            TinylinkError::Forbidden(_) | TinylinkError::LoginFailed(_) => StatusCode::FORBIDDEN,
            TinylinkError::EmailBlank(_)
            | TinylinkError::SecretBlank(_)
            | TinylinkError::EmailTaken(_)
            | TinylinkError::Validation(_) => StatusCode::BAD_REQUEST,
            TinylinkError::CodeSpaceExhausted(_)
            | TinylinkError::PasswordHash(_)
            | TinylinkError::Token(_)
            | TinylinkError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于启动失败时的终端输出）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for TinylinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for TinylinkError {}

// 便捷的构造函数
impl TinylinkError {
    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        TinylinkError::NotFound(msg.into())
    }

    pub fn unauthenticated<T: Into<String>>(msg: T) -> Self {
        TinylinkError::Unauthenticated(msg.into())
    }

    pub fn forbidden<T: Into<String>>(msg: T) -> Self {
        TinylinkError::Forbidden(msg.into())
    }

    pub fn login_failed<T: Into<String>>(msg: T) -> Self {
        TinylinkError::LoginFailed(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        TinylinkError::Validation(msg.into())
    }

    pub fn password_hash<T: Into<String>>(msg: T) -> Self {
        TinylinkError::PasswordHash(msg.into())
    }

    pub fn token<T: Into<String>>(msg: T) -> Self {
        TinylinkError::Token(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        TinylinkError::Config(msg.into())
    }
}

impl From<RegisterError> for TinylinkError {
    fn from(err: RegisterError) -> Self {
        match err {
            RegisterError::EmailBlank => {
                TinylinkError::EmailBlank("A valid email is required to register".to_string())
            }
            RegisterError::SecretBlank => {
                TinylinkError::SecretBlank("A password is required to register".to_string())
            }
            RegisterError::EmailTaken(email) => {
                TinylinkError::EmailTaken(format!("{} is already in use", email))
            }
            RegisterError::Hash(msg) => TinylinkError::PasswordHash(msg),
        }
    }
}

impl From<CredentialError> for TinylinkError {
    fn from(err: CredentialError) -> Self {
        match err {
            // 不区分“邮箱不存在”和“密码错误”，避免枚举账号
            CredentialError::NotFound | CredentialError::Mismatch => {
                TinylinkError::LoginFailed("Invalid email or password".to_string())
            }
            CredentialError::Hash(msg) => TinylinkError::PasswordHash(msg),
        }
    }
}

impl From<RegistryError> for TinylinkError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(code) => {
                TinylinkError::NotFound(format!("Short code '{}' not found", code))
            }
            RegistryError::NotOwner(code) => {
                TinylinkError::Forbidden(format!("You do not own short code '{}'", code))
            }
            RegistryError::CodeSpaceExhausted { attempts } => TinylinkError::CodeSpaceExhausted(
                format!("No free short code found after {} attempts", attempts),
            ),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TinylinkError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        TinylinkError::Token(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TinylinkError>;
