//! Server mode
//!
//! This module contains the HTTP server startup logic.

use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::{Context, Result};
use tracing::warn;

use crate::api::constants::MAX_BODY_BYTES;
use crate::api::services::check_ip_routes;
use crate::runtime::lifetime;

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    let startup = lifetime::startup::prepare_server_startup()
        .await
        .map_err(|e| {
            tracing::error!("Server startup failed: {}", e);
            e
        })?;

    let config = crate::config::get_config();
    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let lookup_service = web::Data::new(startup.lookup_service);
    let auth_gate = web::Data::from(startup.auth_gate);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .app_data(lookup_service.clone())
            .app_data(auth_gate.clone())
            .app_data(web::PayloadConfig::new(MAX_BODY_BYTES))
            .wrap(
                DefaultHeaders::new()
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .service(check_ip_routes())
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .workers(cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await
        .context("HTTP server error")?;

    warn!("Server stopped");
    Ok(())
}
