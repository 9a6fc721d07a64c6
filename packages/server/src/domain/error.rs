//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// Identity is empty or whitespace-only
    #[error("Identity cannot be empty")]
    IdentityEmpty,

    /// Username validation error
    #[error("Username cannot be empty")]
    UsernameEmpty,

    /// Username too long error
    #[error("Username cannot exceed {max} characters (got {actual})")]
    UsernameTooLong { max: usize, actual: usize },

    /// MessageContent validation error
    #[error("MessageContent cannot be empty")]
    MessageContentEmpty,
}

/// Errors related to the active session registry
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The session is already registered
    #[error("Session '{0}' is already registered")]
    AlreadyRegistered(String),

    /// Only Active sessions may enter the registry
    #[error("Session '{0}' is not active")]
    NotActive(String),
}

/// Errors raised by the message persistence collaborator
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// No user with the given id exists
    #[error("User '{0}' not found")]
    UserNotFound(u64),
}

/// Errors related to a single session's outbound path
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The session is closed or its writer has gone away
    #[error("Session '{0}' is closed")]
    Closed(String),

    /// The peer is not reading and its outbound queue is full
    #[error("Session '{0}' outbound queue is full")]
    Backlogged(String),
}
