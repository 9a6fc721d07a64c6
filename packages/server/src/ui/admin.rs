//! Admin HTTP API server.

use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::{net::TcpListener, sync::watch, task::JoinHandle};
use tower_http::trace::TraceLayer;

use crate::{
    domain::SessionRegistry,
    error::ServerError,
    ui::{handler, signal::wait_for_shutdown, state::AppState},
};

/// Build the admin router.
pub fn router(registry: Arc<dyn SessionRegistry>) -> Router {
    let state = Arc::new(AppState { registry });

    Router::new()
        .route("/api/health", get(handler::health_check))
        .route("/api/sessions", get(handler::list_sessions))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the admin listener.
///
/// # Errors
///
/// Returns `ServerError::Bind` if the address is unavailable.
pub async fn bind_admin(host: &str, port: u16) -> Result<TcpListener, ServerError> {
    TcpListener::bind((host, port))
        .await
        .map_err(|source| ServerError::Bind {
            addr: format!("{}:{}", host, port),
            source,
        })
}

/// Serve the admin API until the shutdown flag flips.
pub fn spawn_admin(
    listener: TcpListener,
    registry: Arc<dyn SessionRegistry>,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Ok(addr) = listener.local_addr() {
            tracing::info!("Admin API listening on http://{}", addr);
        }
        let result = axum::serve(listener, router(registry))
            .with_graceful_shutdown(async move { wait_for_shutdown(&mut shutdown).await })
            .await;
        if let Err(e) = result {
            tracing::error!("Admin API error: {}", e);
        }
    })
}
