//! Server-level error definitions.

use thiserror::Error;

/// Errors that abort server startup
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listening address could not be bound
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Other I/O failure while setting up the server
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
