//! Short-code resolution and ownership engine
//!
//! Everything here is in-memory and synchronous apart from credential
//! hashing. State lives in explicit store objects handed to each component.

pub mod code_generator;
pub mod credentials;
pub mod identity;
pub mod models;
pub mod policy;
pub mod registry;
pub mod visits;

pub use code_generator::{CodeGenerator, CodeSpaceExhausted, DEFAULT_CODE_LENGTH};
pub use credentials::{Argon2Hasher, CredentialHasher};
pub use identity::{CredentialError, IdentityStore, RegisterError};
pub use models::{Account, AccountId, Link};
pub use policy::{AccessPolicy, Decision, Operation};
pub use registry::{LinkRegistry, RegistryError};
pub use visits::{LinkStats, VisitTracker};
