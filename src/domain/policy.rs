//! Access decisions for per-code operations
//!
//! Precedence is fixed: existence, then authentication, then ownership.
//! A missing code is reported as missing even to anonymous callers.
//! The public redirect path never consults this policy.

use std::sync::Arc;

use strum::AsRefStr;
use tracing::trace;

use super::models::{Account, Link};
use super::registry::LinkRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Operation {
    View,
    Edit,
    Delete,
    Create,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Decision {
    NotFound,
    Unauthenticated,
    Forbidden,
    Allowed,
}

impl Decision {
    #[inline]
    pub fn is_allowed(self) -> bool {
        self == Decision::Allowed
    }
}

/// Side-effect free decision function over the registry
#[derive(Clone)]
pub struct AccessPolicy {
    registry: Arc<LinkRegistry>,
}

impl AccessPolicy {
    pub fn new(registry: Arc<LinkRegistry>) -> Self {
        Self { registry }
    }

    pub fn decide(&self, identity: Option<&Account>, code: &str, operation: Operation) -> Decision {
        let decision = match operation {
            Operation::Create => Self::require_identity(identity),
            _ => Self::evaluate(identity, self.registry.get(code).as_ref(), operation),
        };
        trace!(
            "AccessPolicy: {} '{}' by {:?} -> {}",
            operation.as_ref(),
            code,
            identity.map(|account| account.id.as_str()),
            decision.as_ref()
        );
        decision
    }

    /// Decide against a link the caller already fetched.
    ///
    /// Lets a caller read the link once and decide on that same snapshot.
    pub fn evaluate(identity: Option<&Account>, link: Option<&Link>, operation: Operation) -> Decision {
        if operation == Operation::Create {
            return Self::require_identity(identity);
        }

        let Some(link) = link else {
            return Decision::NotFound;
        };
        let Some(account) = identity else {
            return Decision::Unauthenticated;
        };
        if !link.is_owned_by(&account.id) {
            return Decision::Forbidden;
        }
        Decision::Allowed
    }

    /// Operations that need a caller but no particular link
    pub fn require_identity(identity: Option<&Account>) -> Decision {
        if identity.is_some() {
            Decision::Allowed
        } else {
            Decision::Unauthenticated
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::AccountId;

    fn account(id: &str) -> Account {
        Account {
            id: AccountId::from(id),
            email: format!("{}@example.com", id),
        }
    }

    fn link_owned_by(id: &str) -> Link {
        Link::new("b2xVn2".to_string(), "https://www.tsn.ca".to_string(), AccountId::from(id))
    }

    #[test]
    fn test_missing_link_wins_over_missing_identity() {
        for op in [Operation::View, Operation::Edit, Operation::Delete] {
            assert_eq!(AccessPolicy::evaluate(None, None, op), Decision::NotFound);
            assert_eq!(
                AccessPolicy::evaluate(Some(&account("a")), None, op),
                Decision::NotFound
            );
        }
    }

    #[test]
    fn test_existing_link_requires_identity() {
        let link = link_owned_by("a");
        assert_eq!(
            AccessPolicy::evaluate(None, Some(&link), Operation::View),
            Decision::Unauthenticated
        );
    }

    #[test]
    fn test_owner_allowed_other_forbidden() {
        let link = link_owned_by("a");
        for op in [Operation::View, Operation::Edit, Operation::Delete] {
            assert_eq!(
                AccessPolicy::evaluate(Some(&account("a")), Some(&link), op),
                Decision::Allowed
            );
            assert_eq!(
                AccessPolicy::evaluate(Some(&account("b")), Some(&link), op),
                Decision::Forbidden
            );
        }
    }

    #[test]
    fn test_create_ignores_link() {
        let link = link_owned_by("a");
        assert_eq!(
            AccessPolicy::evaluate(None, Some(&link), Operation::Create),
            Decision::Unauthenticated
        );
        assert_eq!(
            AccessPolicy::evaluate(Some(&account("b")), None, Operation::Create),
            Decision::Allowed
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(Operation::Delete.as_ref(), "delete");
        assert_eq!(Decision::NotFound.as_ref(), "not_found");
        assert!(Decision::Allowed.is_allowed());
        assert!(!Decision::Forbidden.is_allowed());
    }
}
