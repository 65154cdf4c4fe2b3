//! Link management service
//!
//! Every per-code operation asks [`AccessPolicy`] first and only touches the
//! registry on `Allowed`. The public redirect path skips the policy.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::{
    AccessPolicy, Account, Decision, Link, LinkRegistry, LinkStats, Operation, VisitTracker,
};
use crate::errors::{Result, TinylinkError};

/// A link together with its derived visit statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkDetails {
    #[serde(flatten)]
    pub link: Link,
    #[serde(flatten)]
    pub stats: LinkStats,
}

impl From<Link> for LinkDetails {
    fn from(link: Link) -> Self {
        let stats = VisitTracker::stats(&link);
        Self { link, stats }
    }
}

/// Service for link operations shared by every HTTP handler
pub struct LinkService {
    registry: Arc<LinkRegistry>,
    policy: AccessPolicy,
    tracker: VisitTracker,
}

impl LinkService {
    pub fn new(registry: Arc<LinkRegistry>) -> Self {
        Self {
            policy: AccessPolicy::new(Arc::clone(&registry)),
            tracker: VisitTracker::new(Arc::clone(&registry)),
            registry,
        }
    }

    pub fn registry(&self) -> &Arc<LinkRegistry> {
        &self.registry
    }

    // ============ Owner operations ============

    /// Create a link owned by the caller
    pub fn create_link(&self, identity: Option<&Account>, target: &str) -> Result<Link> {
        let account = Self::require_account(identity, Operation::Create)?;
        Self::validate_target(target)?;

        let link = self.registry.create(&account.id, target.trim())?;
        info!("LinkService: {} created '{}'", account.id, link.code);
        Ok(link)
    }

    /// A single link with its statistics; owner only
    pub fn view_link(&self, identity: Option<&Account>, code: &str) -> Result<LinkDetails> {
        self.authorize(identity, code, Operation::View)?;

        // 授权后链接仍可能被并发删除
        let link = self
            .registry
            .get(code)
            .ok_or_else(|| TinylinkError::not_found(format!("Short code '{}' not found", code)))?;
        Ok(LinkDetails::from(link))
    }

    /// Replace a link's target; owner only
    pub fn update_link(&self, identity: Option<&Account>, code: &str, target: &str) -> Result<Link> {
        let account = self.authorize(identity, code, Operation::Edit)?;
        Self::validate_target(target)?;

        let link = self.registry.update_target(code, target.trim(), &account.id)?;
        Ok(link)
    }

    /// Delete a link; owner only
    pub fn delete_link(&self, identity: Option<&Account>, code: &str) -> Result<()> {
        let account = self.authorize(identity, code, Operation::Delete)?;
        self.registry.delete(code, &account.id)?;
        Ok(())
    }

    /// All links owned by the caller, oldest first
    pub fn list_links(&self, identity: Option<&Account>) -> Result<Vec<LinkDetails>> {
        let account = Self::require_account(identity, Operation::View)?;
        let links = self.registry.list_for_owner(&account.id);
        debug!("LinkService: listing {} links for {}", links.len(), account.id);
        Ok(links.into_iter().map(LinkDetails::from).collect())
    }

    // ============ Public redirect ============

    /// Resolve `code` to its target and count one visit from `origin`
    pub fn resolve_redirect(&self, code: &str, origin: &str) -> Result<String> {
        let link = self
            .registry
            .get(code)
            .ok_or_else(|| TinylinkError::not_found(format!("Short code '{}' not found", code)))?;

        self.tracker.record_visit(code, origin)?;
        Ok(link.target)
    }

    // ============ Helpers ============

    fn authorize<'a>(
        &self,
        identity: Option<&'a Account>,
        code: &str,
        operation: Operation,
    ) -> Result<&'a Account> {
        let decision = self.policy.decide(identity, code, operation);
        match (decision, identity) {
            (Decision::Allowed, Some(account)) => Ok(account),
            (Decision::NotFound, _) => Err(TinylinkError::not_found(format!(
                "Short code '{}' not found",
                code
            ))),
            (Decision::Forbidden, _) => {
                warn!(
                    "LinkService: {} denied on '{}' for {:?}",
                    operation.as_ref(),
                    code,
                    identity.map(|a| a.id.as_str())
                );
                Err(TinylinkError::forbidden(format!(
                    "You do not own short code '{}'",
                    code
                )))
            }
            (Decision::Unauthenticated, _) | (Decision::Allowed, None) => Err(
                TinylinkError::unauthenticated("You must be logged in to access this link"),
            ),
        }
    }

    fn require_account(identity: Option<&Account>, operation: Operation) -> Result<&Account> {
        match (AccessPolicy::require_identity(identity), identity) {
            (Decision::Allowed, Some(account)) => Ok(account),
            _ => Err(TinylinkError::unauthenticated(format!(
                "You must be logged in to {} links",
                operation.as_ref()
            ))),
        }
    }

    fn validate_target(target: &str) -> Result<()> {
        if target.trim().is_empty() {
            return Err(TinylinkError::validation("A target URL is required"));
        }
        Ok(())
    }
}
