//! Domain layer for the chat server.
//!
//! This module contains business logic that is independent of
//! transport and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod repository;
pub mod value_object;

pub use entity::{OUTBOUND_QUEUE_CAPACITY, Session, SessionState, StoredMessage, join_notice, leave_notice};
pub use error::{RegistryError, RepositoryError, SessionError, ValueObjectError};
pub use repository::{MessageRepository, SessionRegistry};
pub use value_object::{Identity, MessageContent, SessionId, Timestamp, UserId, Username};
