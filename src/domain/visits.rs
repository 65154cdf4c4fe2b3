//! Per-origin visit counting

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::models::Link;
use super::registry::{LinkRegistry, RegistryError};

/// Aggregates derived from a link's visit counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LinkStats {
    pub total_visits: u64,
    pub unique_origins: usize,
}

/// Records redirect traversals against the registry's links
#[derive(Clone)]
pub struct VisitTracker {
    registry: Arc<LinkRegistry>,
}

impl VisitTracker {
    pub fn new(registry: Arc<LinkRegistry>) -> Self {
        Self { registry }
    }

    /// Count one redirect of `code` from `origin`
    pub fn record_visit(&self, code: &str, origin: &str) -> Result<u64, RegistryError> {
        let count = self.registry.bump_visit(code, origin)?;
        trace!("VisitTracker: '{}' from {} -> {}", code, origin, count);
        Ok(count)
    }

    pub fn total_visits(link: &Link) -> u64 {
        link.visits.values().sum()
    }

    pub fn unique_origins(link: &Link) -> usize {
        link.visits.len()
    }

    pub fn stats(link: &Link) -> LinkStats {
        LinkStats {
            total_visits: Self::total_visits(link),
            unique_origins: Self::unique_origins(link),
        }
    }
}
