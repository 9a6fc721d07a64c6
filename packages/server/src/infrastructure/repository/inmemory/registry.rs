//! InMemory Session Registry 実装
//!
//! ドメイン層が定義する SessionRegistry trait の具体的な実装。
//! 登録順を保つため Vec をストレージとして使用します。
//!
//! 変更（add / remove / drain）のみ write ロックを取り、読み取りは
//! スナップショット（Arc のコピー）を返してすぐにロックを解放します。
//! ブロードキャスト中にロックを保持したまま送信することはありません。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{RegistryError, Session, SessionId, SessionRegistry};

/// インメモリ Session Registry 実装
#[derive(Default)]
pub struct InMemorySessionRegistry {
    /// 登録中のセッション（登録順）
    sessions: RwLock<Vec<Arc<Session>>>,
}

impl InMemorySessionRegistry {
    /// 新しい InMemorySessionRegistry を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRegistry for InMemorySessionRegistry {
    async fn add(&self, session: Arc<Session>) -> Result<(), RegistryError> {
        if !session.is_active() {
            return Err(RegistryError::NotActive(session.id().to_string()));
        }

        let mut sessions = self.sessions.write().await;
        if sessions.iter().any(|s| s.id() == session.id()) {
            return Err(RegistryError::AlreadyRegistered(session.id().to_string()));
        }
        sessions.push(session);
        Ok(())
    }

    async fn remove(&self, id: SessionId) -> bool {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|s| s.id() != id);
        sessions.len() != before
    }

    async fn snapshot(&self) -> Vec<Arc<Session>> {
        self.sessions.read().await.clone()
    }

    async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn drain(&self) -> Vec<Arc<Session>> {
        std::mem::take(&mut *self.sessions.write().await)
    }
}
