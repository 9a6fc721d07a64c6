//! Shared state for the admin HTTP API.

use std::sync::Arc;

use crate::domain::SessionRegistry;

/// Shared application state
pub struct AppState {
    /// Registry of active sessions (shared with the TCP server, read-only here)
    pub registry: Arc<dyn SessionRegistry>,
}
