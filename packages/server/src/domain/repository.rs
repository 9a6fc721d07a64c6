//! Repository traits defined by the domain layer.
//!
//! Implementations live in the infrastructure layer; use cases depend only
//! on these traits.

use std::sync::Arc;

use async_trait::async_trait;

use super::{
    entity::{Session, StoredMessage},
    error::{RegistryError, RepositoryError},
    value_object::{MessageContent, SessionId, UserId, Username},
};

/// Process-wide collection of Active sessions.
///
/// Iteration always happens over [`SessionRegistry::snapshot`], a
/// point-in-time copy in insertion order, so concurrent adds and removes
/// never affect an in-flight broadcast.
#[async_trait]
pub trait SessionRegistry: Send + Sync {
    /// Register an Active session.
    ///
    /// # Errors
    ///
    /// `AlreadyRegistered` if the same session is added twice, `NotActive`
    /// if the session has not completed its handshake or is already closed.
    async fn add(&self, session: Arc<Session>) -> Result<(), RegistryError>;

    /// Remove a session. Returns `true` only if membership changed.
    async fn remove(&self, id: SessionId) -> bool;

    /// Point-in-time copy of the registered sessions in insertion order.
    async fn snapshot(&self) -> Vec<Arc<Session>>;

    /// Number of registered sessions.
    async fn count(&self) -> usize;

    /// Remove and return every registered session.
    async fn drain(&self) -> Vec<Arc<Session>>;
}

/// Persistence collaborator for chat messages.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Register a user, returning the existing id if the username is known.
    async fn register_user(&self, username: Username) -> UserId;

    /// Store a message for a user.
    async fn store_message(
        &self,
        user_id: UserId,
        text: MessageContent,
    ) -> Result<(), RepositoryError>;

    /// Load every stored message, ascending by creation time.
    async fn load_messages(&self) -> Vec<StoredMessage>;
}
