//! Server entry point: bind, serve until a shutdown signal, drain.

use crate::{
    config::ServerConfig,
    error::ServerError,
    ui::{
        admin::{bind_admin, spawn_admin},
        listener::Server,
        signal::shutdown_signal,
    },
};

/// Run the broadcast server (and the admin API when configured) until
/// Ctrl+C or SIGTERM.
///
/// # Errors
///
/// Fails only if a listening address cannot be bound.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    tracing::info!("Starting chat server on {}...", config.bind_address());

    let server = Server::bind(config.clone()).await?;
    let admin_listener = match config.admin_port {
        Some(port) => Some(bind_admin(config.host(), port).await?),
        None => None,
    };

    let handle = server.start();
    let admin = admin_listener
        .map(|listener| spawn_admin(listener, handle.registry(), handle.subscribe_shutdown()));

    shutdown_signal().await;
    tracing::info!("Shutdown signal received");

    handle.shutdown().await;
    if let Some(admin) = admin
        && let Err(e) = admin.await
    {
        tracing::error!("Admin API task failed: {}", e);
    }

    Ok(())
}
