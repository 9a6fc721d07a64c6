//! Client error definitions.

use thiserror::Error;

use hiroba_server::domain::ValueObjectError;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server could not be reached
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The configured display name is not usable
    #[error("invalid name: {0}")]
    InvalidName(#[from] ValueObjectError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
