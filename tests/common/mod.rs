//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use tinylink::domain::{Account, AccountId, CredentialHasher, IdentityStore};
use tinylink::utils::password::PasswordError;

/// Cheap reversible "hash" so integration tests don't pay for Argon2
pub struct PlainHasher;

impl CredentialHasher for PlainHasher {
    fn hash(&self, secret: &str) -> Result<String, PasswordError> {
        Ok(format!("plain${}", secret))
    }

    fn verify(&self, secret: &str, hash: &str) -> Result<bool, PasswordError> {
        Ok(hash == format!("plain${}", secret))
    }
}

pub fn identity_store() -> Arc<IdentityStore> {
    Arc::new(IdentityStore::new(Arc::new(PlainHasher)))
}

pub fn account(id: &str) -> Account {
    Account {
        id: AccountId::from(id),
        email: format!("{}@example.com", id),
    }
}
