//! Account registry and credential verification

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use super::credentials::CredentialHasher;
use super::models::{Account, AccountId};

/// Registration failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterError {
    EmailBlank,
    SecretBlank,
    EmailTaken(String),
    Hash(String),
}

impl fmt::Display for RegisterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmailBlank => write!(f, "email is blank"),
            Self::SecretBlank => write!(f, "secret is blank"),
            Self::EmailTaken(email) => write!(f, "email already registered: {}", email),
            Self::Hash(msg) => write!(f, "failed to hash secret: {}", msg),
        }
    }
}

impl std::error::Error for RegisterError {}

/// Credential verification failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    NotFound,
    Mismatch,
    Hash(String),
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "no account with that email"),
            Self::Mismatch => write!(f, "secret does not match"),
            Self::Hash(msg) => write!(f, "failed to verify secret: {}", msg),
        }
    }
}

impl std::error::Error for CredentialError {}

struct AccountRecord {
    account: Account,
    credential_hash: String,
}

#[derive(Default)]
struct IdentityState {
    by_id: HashMap<AccountId, AccountRecord>,
    /// email → id，替代线性扫描
    by_email: HashMap<String, AccountId>,
}

/// In-memory account store.
///
/// Hashing runs on the blocking pool, so `register` and
/// `verify_credential` are async while lookups stay synchronous.
pub struct IdentityStore {
    state: RwLock<IdentityState>,
    hasher: Arc<dyn CredentialHasher>,
}

impl IdentityStore {
    pub fn new(hasher: Arc<dyn CredentialHasher>) -> Self {
        Self {
            state: RwLock::new(IdentityState::default()),
            hasher,
        }
    }

    /// Register a new account.
    ///
    /// Email and secret are stored as given: only the empty string counts as
    /// blank, and email comparison is exact and case-sensitive. The uniqueness
    /// check is repeated under the write lock, so two concurrent registrations
    /// for the same email cannot both succeed.
    pub async fn register(&self, email: &str, secret: &str) -> Result<Account, RegisterError> {
        if email.is_empty() {
            return Err(RegisterError::EmailBlank);
        }
        if secret.is_empty() {
            return Err(RegisterError::SecretBlank);
        }

        // 先快速检查，避免对注定失败的请求做昂贵的哈希
        if self.state.read().by_email.contains_key(email) {
            debug!("IdentityStore: registration rejected, email taken: {}", email);
            return Err(RegisterError::EmailTaken(email.to_string()));
        }

        let credential_hash = self.hash_secret(secret).await?;

        let mut state = self.state.write();
        if state.by_email.contains_key(email) {
            debug!("IdentityStore: registration lost race for email: {}", email);
            return Err(RegisterError::EmailTaken(email.to_string()));
        }

        let account = Account {
            id: AccountId::generate(),
            email: email.to_string(),
        };
        state
            .by_email
            .insert(account.email.clone(), account.id.clone());
        state.by_id.insert(
            account.id.clone(),
            AccountRecord {
                account: account.clone(),
                credential_hash,
            },
        );

        info!("IdentityStore: registered account {} <{}>", account.id, account.email);
        Ok(account)
    }

    pub fn find_by_email(&self, email: &str) -> Option<Account> {
        let state = self.state.read();
        state
            .by_email
            .get(email)
            .and_then(|id| state.by_id.get(id))
            .map(|record| record.account.clone())
    }

    pub fn find_by_id(&self, id: &AccountId) -> Option<Account> {
        self.state
            .read()
            .by_id
            .get(id)
            .map(|record| record.account.clone())
    }

    /// Look up by email, then check `secret` against the stored hash
    pub async fn verify_credential(
        &self,
        email: &str,
        secret: &str,
    ) -> Result<Account, CredentialError> {
        let (account, credential_hash) = {
            let state = self.state.read();
            let record = state
                .by_email
                .get(email)
                .and_then(|id| state.by_id.get(id))
                .ok_or(CredentialError::NotFound)?;
            (record.account.clone(), record.credential_hash.clone())
        };

        let hasher = Arc::clone(&self.hasher);
        let secret = secret.to_string();
        let matched = tokio::task::spawn_blocking(move || hasher.verify(&secret, &credential_hash))
            .await
            .map_err(|e| CredentialError::Hash(e.to_string()))?
            .map_err(|e| CredentialError::Hash(e.to_string()))?;

        if matched {
            debug!("IdentityStore: credential verified for {}", account.id);
            Ok(account)
        } else {
            warn!("IdentityStore: credential mismatch for {}", email);
            Err(CredentialError::Mismatch)
        }
    }

    pub fn len(&self) -> usize {
        self.state.read().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    async fn hash_secret(&self, secret: &str) -> Result<String, RegisterError> {
        let hasher = Arc::clone(&self.hasher);
        let secret = secret.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&secret))
            .await
            .map_err(|e| RegisterError::Hash(e.to_string()))?
            .map_err(|e| RegisterError::Hash(e.to_string()))
    }
}
