//! Core domain models for the chat server.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};
use tokio::sync::{
    mpsc::{self, error::TrySendError},
    watch,
};

use super::{
    error::SessionError,
    value_object::{Identity, MessageContent, SessionId, Timestamp, UserId, Username},
};

/// Frames a session may have queued before its peer counts as stalled.
pub const OUTBOUND_QUEUE_CAPACITY: usize = 256;

/// Lifecycle state of a [`Session`].
///
/// `Connecting -> Active -> Closed`, with `Connecting -> Closed` for a failed
/// handshake. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionState {
    Connecting,
    Active,
    Closed,
}

impl SessionState {
    /// Whether moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(self, next: SessionState) -> bool {
        matches!(
            (self, next),
            (SessionState::Connecting, SessionState::Active)
                | (SessionState::Connecting, SessionState::Closed)
                | (SessionState::Active, SessionState::Closed)
        )
    }
}

/// Server-side state for one accepted connection.
///
/// Outbound frames go through an owned channel drained by exactly one writer
/// task, so writes to the underlying stream never interleave. The channel is
/// bounded: a peer that stops reading fills it and further sends fail. The lifecycle
/// state lives in a `watch` channel: any task may close the session and the
/// connection task observes it to stop its blocking read and write.
pub struct Session {
    id: SessionId,
    identity: Identity,
    peer_addr: SocketAddr,
    connected_at: Timestamp,
    outbound: mpsc::Sender<String>,
    state: watch::Sender<SessionState>,
}

impl Session {
    /// Create a new session in the `Connecting` state.
    pub fn new(
        identity: Identity,
        peer_addr: SocketAddr,
        connected_at: Timestamp,
        outbound: mpsc::Sender<String>,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::Connecting);
        Self {
            id: SessionId::generate(),
            identity,
            peer_addr,
            connected_at,
            outbound,
            state,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    pub fn connected_at(&self) -> Timestamp {
        self.connected_at
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    pub fn is_active(&self) -> bool {
        self.state() == SessionState::Active
    }

    /// Move the session to `Active`. Returns `false` if it was not `Connecting`.
    pub fn activate(&self) -> bool {
        self.transition(SessionState::Active)
    }

    /// Close the session.
    ///
    /// Returns `true` only for the call that actually performed the
    /// transition; later calls are no-ops.
    pub fn close(&self) -> bool {
        self.transition(SessionState::Closed)
    }

    /// Resolve once the session has been closed from any task.
    pub async fn closed(&self) {
        let mut rx = self.state.subscribe();
        // The sender lives as long as `self`, so this only returns on Closed.
        let _ = rx.wait_for(|state| *state == SessionState::Closed).await;
    }

    /// Queue one frame for this session's writer.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Closed` if the session is closed or its writer
    /// has stopped, and `SessionError::Backlogged` if the queue is full.
    pub fn send(&self, frame: &str) -> Result<(), SessionError> {
        if self.state() == SessionState::Closed {
            return Err(SessionError::Closed(self.id.to_string()));
        }
        self.outbound
            .try_send(frame.to_string())
            .map_err(|e| match e {
                TrySendError::Full(_) => SessionError::Backlogged(self.id.to_string()),
                TrySendError::Closed(_) => SessionError::Closed(self.id.to_string()),
            })
    }

    fn transition(&self, next: SessionState) -> bool {
        self.state.send_if_modified(|state| {
            if state.can_transition_to(next) {
                *state = next;
                true
            } else {
                false
            }
        })
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("identity", &self.identity)
            .field("peer_addr", &self.peer_addr)
            .field("state", &self.state())
            .finish()
    }
}

/// A chat message as stored by the persistence collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMessage {
    /// Sender's user ID
    pub sender_id: UserId,
    /// Sender's username (joined from the user table)
    pub sender_name: Username,
    /// Message text
    pub text: MessageContent,
    /// Timestamp when the message was stored
    pub created_at: Timestamp,
}

/// Notice broadcast to other peers when a session becomes active.
pub fn join_notice(identity: &Identity) -> String {
    format!("{} has entered the chat!", identity)
}

/// Notice broadcast to remaining peers when a registered session is torn down.
pub fn leave_notice(identity: &Identity) -> String {
    format!("{} has left the chat!", identity)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_session(name: &str) -> (Session, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(OUTBOUND_QUEUE_CAPACITY);
        let session = Session::new(
            Identity::new(name.to_string()).unwrap(),
            "127.0.0.1:40000".parse().unwrap(),
            Timestamp::new(1000),
            tx,
        );
        (session, rx)
    }

    #[test]
    fn test_session_state_transitions() {
        // テスト項目: 状態遷移は Connecting -> Active -> Closed のみ許可される
        // then (期待する結果):
        assert!(SessionState::Connecting.can_transition_to(SessionState::Active));
        assert!(SessionState::Connecting.can_transition_to(SessionState::Closed));
        assert!(SessionState::Active.can_transition_to(SessionState::Closed));
        assert!(!SessionState::Active.can_transition_to(SessionState::Connecting));
        assert!(!SessionState::Closed.can_transition_to(SessionState::Active));
        assert!(!SessionState::Closed.can_transition_to(SessionState::Closed));
    }

    #[test]
    fn test_session_starts_connecting() {
        // テスト項目: 新しいセッションは Connecting 状態で作成される
        // when (操作):
        let (session, _rx) = create_session("alice");

        // then (期待する結果):
        assert_eq!(session.state(), SessionState::Connecting);
        assert!(!session.is_active());
    }

    #[test]
    fn test_session_close_is_idempotent() {
        // テスト項目: close は最初の呼び出しのみ true を返す
        // given (前提条件):
        let (session, _rx) = create_session("alice");
        assert!(session.activate());

        // when (操作):
        let first = session.close();
        let second = session.close();

        // then (期待する結果):
        assert!(first);
        assert!(!second);
        assert_eq!(session.state(), SessionState::Closed);
        assert!(!session.activate());
    }

    #[test]
    fn test_session_send_queues_frame() {
        // テスト項目: send したフレームが送信チャンネルに積まれる
        // given (前提条件):
        let (session, mut rx) = create_session("alice");
        session.activate();

        // when (操作):
        session.send("bob: hi").unwrap();

        // then (期待する結果):
        assert_eq!(rx.try_recv().unwrap(), "bob: hi");
    }

    #[test]
    fn test_session_send_after_close_fails() {
        // テスト項目: クローズ後の send はエラーになる
        // given (前提条件):
        let (session, mut rx) = create_session("alice");
        session.activate();
        session.close();

        // when (操作):
        let result = session.send("late");

        // then (期待する結果):
        assert!(matches!(result, Err(SessionError::Closed(_))));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_session_send_without_writer_fails() {
        // テスト項目: 書き込みタスクが終了したセッションへの send はエラーになる
        // given (前提条件):
        let (session, rx) = create_session("alice");
        session.activate();
        drop(rx);

        // when (操作):
        let result = session.send("hello");

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_session_send_to_full_queue_is_backlogged() {
        // テスト項目: 読み出されない送信キューが満杯になると send は Backlogged エラーになる
        // given (前提条件):
        let (session, mut rx) = create_session("alice");
        session.activate();
        for i in 0..OUTBOUND_QUEUE_CAPACITY {
            session.send(&format!("line {}", i)).unwrap();
        }

        // when (操作):
        let result = session.send("one too many");

        // then (期待する結果):
        assert!(matches!(result, Err(SessionError::Backlogged(_))));
        assert_eq!(rx.try_recv().unwrap(), "line 0");
    }

    #[tokio::test]
    async fn test_session_closed_resolves_after_close() {
        // テスト項目: 別タスクからの close で closed() が解決される
        // given (前提条件):
        let (session, _rx) = create_session("alice");
        let session = std::sync::Arc::new(session);
        session.activate();

        // when (操作):
        let waiter = {
            let session = session.clone();
            tokio::spawn(async move { session.closed().await })
        };
        session.close();

        // then (期待する結果):
        tokio::time::timeout(std::time::Duration::from_secs(1), waiter)
            .await
            .expect("closed() did not resolve")
            .unwrap();
    }

    #[test]
    fn test_notices() {
        // テスト項目: 入室・退室通知の文言
        // given (前提条件):
        let identity = Identity::new("bob".to_string()).unwrap();

        // then (期待する結果):
        assert_eq!(join_notice(&identity), "bob has entered the chat!");
        assert_eq!(leave_notice(&identity), "bob has left the chat!");
    }
}
