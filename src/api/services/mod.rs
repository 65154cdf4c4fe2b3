pub mod auth;
pub mod error_code;
pub mod health;
pub mod helpers;
pub mod links;
pub mod redirect;
pub mod routes;
pub mod types;

pub use error_code::ErrorCode;
pub use health::{AppStartTime, HealthService};
pub use redirect::RedirectService;
pub use routes::configure_routes;
pub use types::ApiResponse;
