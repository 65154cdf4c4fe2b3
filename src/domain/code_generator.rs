use std::collections::HashSet;
use std::fmt;
use std::hash::BuildHasher;
use std::iter;

use tracing::{debug, trace};

/// 短码字符集：大小写字母 + 数字
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Upper bound on draws per `generate` call
pub const MAX_GENERATE_ATTEMPTS: usize = 1000;

/// Every draw collided with an existing code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeSpaceExhausted {
    pub attempts: usize,
}

impl fmt::Display for CodeSpaceExhausted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no free short code after {} attempts", self.attempts)
    }
}

impl std::error::Error for CodeSpaceExhausted {}

/// Random fixed-length short code source.
///
/// Codes are public identifiers, not secrets: the thread-local RNG is
/// plenty, but every draw is checked against the caller's existing codes.
#[derive(Debug, Clone, Copy)]
pub struct CodeGenerator {
    length: usize,
    max_attempts: usize,
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH)
    }
}

impl CodeGenerator {
    pub fn new(length: usize) -> Self {
        Self {
            length: length.max(1),
            max_attempts: MAX_GENERATE_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// One candidate, no uniqueness check
    pub fn random_code(&self) -> String {
        iter::repeat_with(|| CODE_ALPHABET[rand::random_range(0..CODE_ALPHABET.len())] as char)
            .take(self.length)
            .collect()
    }

    /// Draw until the code is absent from `existing`
    pub fn generate<S: BuildHasher>(
        &self,
        existing: &HashSet<String, S>,
    ) -> Result<String, CodeSpaceExhausted> {
        self.generate_with(|candidate| existing.contains(candidate))
    }

    /// Draw until `is_taken` rejects nothing
    pub fn generate_with<F>(&self, mut is_taken: F) -> Result<String, CodeSpaceExhausted>
    where
        F: FnMut(&str) -> bool,
    {
        for attempt in 1..=self.max_attempts {
            let candidate = self.random_code();
            if !is_taken(&candidate) {
                trace!("CodeGenerator: '{}' accepted on attempt {}", candidate, attempt);
                return Ok(candidate);
            }
            debug!("CodeGenerator: collision on '{}', retrying", candidate);
        }

        Err(CodeSpaceExhausted {
            attempts: self.max_attempts,
        })
    }
}
