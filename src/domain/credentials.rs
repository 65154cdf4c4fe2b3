//! Credential hashing capability
//!
//! The identity store only needs `hash` and `verify`; the algorithm behind
//! them is pluggable so tests can swap in something cheap.

use crate::utils::password::{self, PasswordError};

pub trait CredentialHasher: Send + Sync + 'static {
    /// One-way hash of `secret`
    fn hash(&self, secret: &str) -> Result<String, PasswordError>;

    /// Whether `secret` matches a hash previously produced by [`hash`](Self::hash)
    fn verify(&self, secret: &str, hash: &str) -> Result<bool, PasswordError>;
}

/// Argon2id with the crate's default parameters
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, secret: &str) -> Result<String, PasswordError> {
        password::hash_password(secret)
    }

    fn verify(&self, secret: &str, hash: &str) -> Result<bool, PasswordError> {
        password::verify_password(secret, hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argon2_hasher_roundtrip() {
        let hasher = Argon2Hasher;
        let hash = hasher.hash("hunter2").unwrap();

        assert!(hasher.verify("hunter2", &hash).unwrap());
        assert!(!hasher.verify("hunter3", &hash).unwrap());
    }
}
