//! UseCase layer error definitions.

use thiserror::Error;

use crate::domain::{RegistryError, ValueObjectError};

/// Reasons a handshake does not produce an Active session
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HandshakeError {
    /// The stream closed before the identity Frame arrived
    #[error("connection closed before handshake")]
    ConnectionClosed,

    /// The identity Frame was empty or whitespace-only
    #[error("invalid identity: {0}")]
    InvalidIdentity(#[from] ValueObjectError),

    /// The registry refused the session
    #[error("registration failed: {0}")]
    Registry(#[from] RegistryError),
}
