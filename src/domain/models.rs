use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque account identifier, assigned once at registration
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Allocate a fresh random id
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for AccountId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for AccountId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A registered account as seen outside the identity store.
///
/// The credential hash is deliberately absent; it never leaves
/// [`IdentityStore`](super::IdentityStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub email: String,
}

/// A short code → target mapping owned by exactly one account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub code: String,
    pub target: String,
    pub owner_id: AccountId,
    pub created_at: DateTime<Utc>,

    /// origin (caller address) → number of redirects from that origin
    #[serde(default)]
    pub visits: HashMap<String, u64>,
}

impl Link {
    pub fn new(code: String, target: String, owner_id: AccountId) -> Self {
        Self {
            code,
            target,
            owner_id,
            created_at: Utc::now(),
            visits: HashMap::new(),
        }
    }

    #[inline]
    pub fn is_owned_by(&self, account_id: &AccountId) -> bool {
        &self.owner_id == account_id
    }
}
