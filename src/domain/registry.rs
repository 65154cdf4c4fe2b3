//! Short code → link mapping with ownership checks

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{debug, info, trace};

use super::code_generator::{CodeGenerator, CodeSpaceExhausted};
use super::models::{AccountId, Link};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    NotFound(String),
    NotOwner(String),
    CodeSpaceExhausted { attempts: usize },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(code) => write!(f, "short code not found: {}", code),
            Self::NotOwner(code) => write!(f, "requester does not own: {}", code),
            Self::CodeSpaceExhausted { attempts } => {
                write!(f, "no free short code after {} attempts", attempts)
            }
        }
    }
}

impl std::error::Error for RegistryError {}

impl From<CodeSpaceExhausted> for RegistryError {
    fn from(err: CodeSpaceExhausted) -> Self {
        Self::CodeSpaceExhausted {
            attempts: err.attempts,
        }
    }
}

struct RegistryEntry {
    /// 插入序号，用于稳定的列表顺序
    seq: u64,
    link: Link,
}

/// Concurrent code → link map.
///
/// Each entry sits behind its DashMap shard lock, so insertion of a fresh
/// code and visit increments are atomic per code without a global mutex.
pub struct LinkRegistry {
    links: DashMap<String, RegistryEntry>,
    next_seq: AtomicU64,
    generator: CodeGenerator,
}

impl Default for LinkRegistry {
    fn default() -> Self {
        Self::new(CodeGenerator::default())
    }
}

impl LinkRegistry {
    pub fn new(generator: CodeGenerator) -> Self {
        Self {
            links: DashMap::new(),
            next_seq: AtomicU64::new(0),
            generator,
        }
    }

    /// Store a new link under a freshly generated code.
    ///
    /// A candidate can pass the generator's check and still be taken by a
    /// concurrent `create` before we reach the shard; the vacant-entry match
    /// below is the real uniqueness check and loses races by drawing again.
    pub fn create(&self, owner_id: &AccountId, target: &str) -> Result<Link, RegistryError> {
        for _ in 0..self.generator.max_attempts() {
            let code = self
                .generator
                .generate_with(|candidate| self.contains(candidate))?;

            match self.links.entry(code) {
                Entry::Vacant(slot) => {
                    let link = Link::new(slot.key().clone(), target.to_string(), owner_id.clone());
                    let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
                    slot.insert(RegistryEntry {
                        seq,
                        link: link.clone(),
                    });
                    info!(
                        "LinkRegistry: created '{}' -> '{}' for {}",
                        link.code, link.target, owner_id
                    );
                    return Ok(link);
                }
                Entry::Occupied(slot) => {
                    debug!("LinkRegistry: code '{}' claimed concurrently, redrawing", slot.key());
                }
            }
        }

        Err(RegistryError::CodeSpaceExhausted {
            attempts: self.generator.max_attempts(),
        })
    }

    pub fn get(&self, code: &str) -> Option<Link> {
        self.links.get(code).map(|entry| entry.link.clone())
    }

    pub fn contains(&self, code: &str) -> bool {
        self.links.contains_key(code)
    }

    /// Links owned by `owner_id`, in insertion order
    pub fn list_for_owner(&self, owner_id: &AccountId) -> Vec<Link> {
        let mut owned: Vec<(u64, Link)> = self
            .links
            .iter()
            .filter(|entry| entry.link.is_owned_by(owner_id))
            .map(|entry| (entry.seq, entry.link.clone()))
            .collect();
        owned.sort_by_key(|(seq, _)| *seq);

        trace!("LinkRegistry: {} links for {}", owned.len(), owner_id);
        owned.into_iter().map(|(_, link)| link).collect()
    }

    /// Replace the target of an existing link; only the owner may do so
    pub fn update_target(
        &self,
        code: &str,
        new_target: &str,
        requester_id: &AccountId,
    ) -> Result<Link, RegistryError> {
        let mut entry = self
            .links
            .get_mut(code)
            .ok_or_else(|| RegistryError::NotFound(code.to_string()))?;

        if !entry.link.is_owned_by(requester_id) {
            return Err(RegistryError::NotOwner(code.to_string()));
        }

        entry.link.target = new_target.to_string();
        info!("LinkRegistry: updated '{}' -> '{}'", code, new_target);
        Ok(entry.link.clone())
    }

    /// Remove a link; only the owner may do so. The code becomes reusable.
    pub fn delete(&self, code: &str, requester_id: &AccountId) -> Result<Link, RegistryError> {
        match self.links.entry(code.to_string()) {
            Entry::Vacant(_) => Err(RegistryError::NotFound(code.to_string())),
            Entry::Occupied(slot) => {
                if !slot.get().link.is_owned_by(requester_id) {
                    return Err(RegistryError::NotOwner(code.to_string()));
                }
                let removed = slot.remove().link;
                info!("LinkRegistry: deleted '{}'", code);
                Ok(removed)
            }
        }
    }

    /// Increment the counter for `origin` under the entry lock, returning the new count
    pub(crate) fn bump_visit(&self, code: &str, origin: &str) -> Result<u64, RegistryError> {
        let mut entry = self
            .links
            .get_mut(code)
            .ok_or_else(|| RegistryError::NotFound(code.to_string()))?;

        let counter = entry.link.visits.entry(origin.to_string()).or_insert(0);
        *counter += 1;
        Ok(*counter)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}
