//! InMemory Message Repository 実装
//!
//! メッセージ永続化コラボレーターのインメモリ実装。
//! users / messages の 2 テーブル構成を Vec で表現します。
//! 永続性（durability）は保証しません。

use async_trait::async_trait;
use hiroba_shared::time::get_jst_timestamp;
use tokio::sync::Mutex;

use crate::domain::{
    MessageContent, MessageRepository, RepositoryError, StoredMessage, Timestamp, UserId, Username,
};

struct MessageRow {
    user_id: UserId,
    text: MessageContent,
    created_at: Timestamp,
}

#[derive(Default)]
struct Tables {
    users: Vec<(UserId, Username)>,
    messages: Vec<MessageRow>,
}

/// インメモリ Message Repository 実装
#[derive(Default)]
pub struct InMemoryMessageRepository {
    tables: Mutex<Tables>,
}

impl InMemoryMessageRepository {
    /// 新しい InMemoryMessageRepository を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn register_user(&self, username: Username) -> UserId {
        let mut tables = self.tables.lock().await;
        if let Some((id, _)) = tables.users.iter().find(|(_, name)| name == &username) {
            return *id;
        }
        let id = UserId::new(tables.users.len() as u64 + 1);
        tables.users.push((id, username));
        id
    }

    async fn store_message(
        &self,
        user_id: UserId,
        text: MessageContent,
    ) -> Result<(), RepositoryError> {
        let mut tables = self.tables.lock().await;
        if !tables.users.iter().any(|(id, _)| *id == user_id) {
            return Err(RepositoryError::UserNotFound(user_id.value()));
        }
        tables.messages.push(MessageRow {
            user_id,
            text,
            created_at: Timestamp::new(get_jst_timestamp()),
        });
        Ok(())
    }

    async fn load_messages(&self) -> Vec<StoredMessage> {
        let tables = self.tables.lock().await;
        let mut messages: Vec<StoredMessage> = tables
            .messages
            .iter()
            .filter_map(|row| {
                let (_, name) = tables.users.iter().find(|(id, _)| *id == row.user_id)?;
                Some(StoredMessage {
                    sender_id: row.user_id,
                    sender_name: name.clone(),
                    text: row.text.clone(),
                    created_at: row.created_at,
                })
            })
            .collect();

        // stable sort: insertion order breaks ties
        messages.sort_by_key(|m| m.created_at);
        messages
    }
}
