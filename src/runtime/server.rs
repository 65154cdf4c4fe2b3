//! Server mode
//!
//! Builds the shared services and starts the HTTP server.

use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders, Logger},
    web,
};
use anyhow::{Context, Result};
use tracing::warn;

use crate::api::middleware::SessionIdentity;
use crate::api::services::{AppStartTime, configure_routes};
use crate::config::StaticConfig;
use crate::runtime::startup::prepare_server_startup;

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: &StaticConfig, seed_demo: bool) -> Result<()> {
    let app_start_time = AppStartTime::now();

    let startup = prepare_server_startup(config, seed_demo)
        .await
        .inspect_err(|e| tracing::error!("Server startup failed: {}", e))?;

    let auth_service = web::Data::from(startup.auth_service);
    let link_service = web::Data::from(startup.link_service);

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    if config.auth.trusted_proxies.is_empty() {
        warn!("No trusted proxies configured; visits are counted by peer address");
    } else {
        warn!(
            "Trusted proxies configured: {:?}",
            config.auth.trusted_proxies
        );
    }

    let server = HttpServer::new(move || {
        App::new()
            .wrap(SessionIdentity)
            .wrap(Compress::default())
            .wrap(Logger::new("%a \"%r\" %s %b %T"))
            .app_data(auth_service.clone())
            .app_data(link_service.clone())
            .app_data(web::Data::new(app_start_time.clone()))
            .app_data(web::PayloadConfig::new(64 * 1024))
            .wrap(
                DefaultHeaders::new()
                    .add(("Connection", "keep-alive"))
                    .add(("Keep-Alive", "timeout=30, max=1000")),
            )
            .configure(configure_routes)
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .workers(cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await?;

    warn!("Server stopped");
    Ok(())
}
