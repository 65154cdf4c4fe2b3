use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::{AuthConfig, MAX_SESSION_MINUTES};
use crate::domain::AccountId;

const SESSION_TOKEN_TYPE: &str = "session";

/// Session Token Claims
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Account id
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
    pub token_type: String,
}

impl SessionClaims {
    pub fn account_id(&self) -> AccountId {
        AccountId::from(self.sub.as_str())
    }
}

/// JWT Service for issuing and validating session tokens
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    session_minutes: u64,
}

impl JwtService {
    /// `session_minutes` is clamped to `1..=MAX_SESSION_MINUTES`
    pub fn new(secret: &str, session_minutes: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            session_minutes: session_minutes.clamp(1, MAX_SESSION_MINUTES),
        }
    }

    /// Create JwtService from the `[auth]` config section
    pub fn from_config(config: &AuthConfig) -> Self {
        // 获取 JWT secret，如果为空则生成一个随机值
        let secret = if config.jwt_secret.is_empty() {
            warn!("JWT secret not configured, generating a random one; sessions will not survive restarts");
            crate::utils::generate_secure_token(32)
        } else {
            config.jwt_secret.clone()
        };

        Self::new(&secret, config.session_minutes)
    }

    pub fn session_minutes(&self) -> u64 {
        self.session_minutes
    }

    /// Issue a session token whose subject is `account_id`
    pub fn generate_session_token(
        &self,
        account_id: &AccountId,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: account_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(self.session_minutes as i64)).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
            token_type: SESSION_TOKEN_TYPE.to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// Validate a session token
    pub fn validate_session_token(
        &self,
        token: &str,
    ) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &Validation::default())?;

        if token_data.claims.token_type != SESSION_TOKEN_TYPE {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidToken,
            ));
        }

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> JwtService {
        JwtService::new("test_secret_key_32_bytes_long!!", 15)
    }

    #[test]
    fn test_generate_and_validate_session_token() {
        let service = create_test_service();
        let account_id = AccountId::from("b2xVn3");
        let token = service.generate_session_token(&account_id).unwrap();
        let claims = service.validate_session_token(&token).unwrap();

        assert_eq!(claims.account_id(), account_id);
        assert_eq!(claims.token_type, "session");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_session_minutes_clamped() {
        let service = JwtService::new("test_secret_key_32_bytes_long!!", u64::MAX);
        assert_eq!(service.session_minutes(), MAX_SESSION_MINUTES);

        let token = service
            .generate_session_token(&AccountId::from("b2xVn3"))
            .unwrap();
        let claims = service.validate_session_token(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, (MAX_SESSION_MINUTES * 60) as i64);
    }

    #[test]
    fn test_invalid_token_rejected() {
        let service = create_test_service();
        assert!(service.validate_session_token("invalid.token.here").is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let service1 = create_test_service();
        let service2 = JwtService::new("different_secret_key_32_bytes!!", 15);

        let token = service1
            .generate_session_token(&AccountId::from("b2xVn3"))
            .unwrap();
        assert!(service2.validate_session_token(&token).is_err());
    }

    #[test]
    fn test_wrong_token_type_rejected() {
        let service = create_test_service();
        let now = Utc::now();
        let claims = SessionClaims {
            sub: "b2xVn3".to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(5)).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
            token_type: "refresh".to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test_secret_key_32_bytes_long!!"),
        )
        .unwrap();

        assert!(service.validate_session_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = create_test_service();

        // 过期时间超过默认 leeway
        let now = Utc::now();
        let claims = SessionClaims {
            sub: "b2xVn3".to_string(),
            iat: (now - Duration::hours(2)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
            token_type: "session".to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test_secret_key_32_bytes_long!!"),
        )
        .unwrap();

        let result = service.validate_session_token(&token);
        assert!(result.is_err(), "Expected expired token to be rejected, got: {:?}", result);
    }

    #[test]
    fn test_empty_secret_generates_random_key() {
        let config = AuthConfig::default();
        let a = JwtService::from_config(&config);
        let b = JwtService::from_config(&config);

        let token = a.generate_session_token(&AccountId::from("x")).unwrap();
        assert!(a.validate_session_token(&token).is_ok());
        assert!(b.validate_session_token(&token).is_err());
    }
}
