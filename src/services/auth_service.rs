//! Registration, login and session token resolution

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::api::jwt::JwtService;
use crate::domain::{Account, IdentityStore};
use crate::errors::{Result, TinylinkError};

/// An authenticated account plus the token that proves it
#[derive(Debug, Clone)]
pub struct Session {
    pub account: Account,
    pub token: String,
}

pub struct AuthService {
    identities: Arc<IdentityStore>,
    jwt: JwtService,
}

impl AuthService {
    pub fn new(identities: Arc<IdentityStore>, jwt: JwtService) -> Self {
        Self { identities, jwt }
    }

    pub fn identities(&self) -> &Arc<IdentityStore> {
        &self.identities
    }

    pub fn session_minutes(&self) -> u64 {
        self.jwt.session_minutes()
    }

    /// Create an account and log it in
    pub async fn register(&self, email: &str, password: &str) -> Result<Session> {
        let account = self.identities.register(email, password).await?;
        self.issue(account)
    }

    /// Verify credentials and issue a session
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let account = self
            .identities
            .verify_credential(email, password)
            .await
            .map_err(|e| {
                debug!("AuthService: login failed for {}: {}", email, e);
                TinylinkError::from(e)
            })?;
        info!("AuthService: {} logged in", account.id);
        self.issue(account)
    }

    /// Resolve a session token to a live account.
    ///
    /// Bad signatures, expired tokens and tokens for accounts that no longer
    /// resolve all yield `None`.
    pub fn resolve_token(&self, token: &str) -> Option<Account> {
        let claims = match self.jwt.validate_session_token(token) {
            Ok(claims) => claims,
            Err(e) => {
                debug!("AuthService: rejected session token: {}", e);
                return None;
            }
        };
        self.identities.find_by_id(&claims.account_id())
    }

    fn issue(&self, account: Account) -> Result<Session> {
        let token = self.jwt.generate_session_token(&account.id).map_err(|e| {
            error!("AuthService: failed to generate session token: {}", e);
            TinylinkError::from(e)
        })?;
        Ok(Session { account, token })
    }
}
