pub mod auth_service;
pub mod link_service;

pub use auth_service::{AuthService, Session};
pub use link_service::{LinkDetails, LinkService};
