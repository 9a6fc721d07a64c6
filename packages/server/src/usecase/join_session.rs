//! UseCase: ハンドシェイク（入室）処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinSessionUseCase::execute() メソッド
//! - 表示名の検証、Registry への登録、入室通知のブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 空の表示名では登録も通知も行われないことを保証
//! - 入室通知は本人以外にのみ届くことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規セッションの登録と入室通知
//! - 異常系：空・空白のみの表示名

use std::{net::SocketAddr, sync::Arc};

use hiroba_shared::time::get_jst_timestamp;
use tokio::sync::mpsc;

use crate::domain::{Identity, Session, SessionRegistry, Timestamp, join_notice};

use super::{broadcast::BroadcastUseCase, error::HandshakeError};

/// 入室のユースケース
pub struct JoinSessionUseCase {
    /// Registry（データアクセス層の抽象化）
    registry: Arc<dyn SessionRegistry>,
}

impl JoinSessionUseCase {
    /// 新しい JoinSessionUseCase を作成
    pub fn new(registry: Arc<dyn SessionRegistry>) -> Self {
        Self { registry }
    }

    /// 入室を実行
    ///
    /// # Arguments
    ///
    /// * `identity_line` - ハンドシェイクで受信した最初のフレーム
    /// * `peer_addr` - 接続元アドレス
    /// * `outbound` - このセッションの送信チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(Arc<Session>)` - Active になり登録されたセッション
    /// * `Err(HandshakeError)` - 表示名が不正、または登録失敗
    pub async fn execute(
        &self,
        identity_line: String,
        peer_addr: SocketAddr,
        outbound: mpsc::Sender<String>,
    ) -> Result<Arc<Session>, HandshakeError> {
        // 1. 表示名の検証
        let identity = Identity::try_from(identity_line)?;

        // 2. セッションを Active にして Registry に追加
        let session = Arc::new(Session::new(
            identity,
            peer_addr,
            Timestamp::new(get_jst_timestamp()),
            outbound,
        ));
        session.activate();
        if let Err(e) = self.registry.add(session.clone()).await {
            session.close();
            return Err(e.into());
        }

        tracing::info!(
            "User '{}' joined the chat. Total users: {}",
            session.identity(),
            self.registry.count().await
        );

        // 3. 本人以外に入室通知
        let notice = join_notice(session.identity());
        BroadcastUseCase::new(self.registry.clone())
            .execute(&notice, session.identity())
            .await;

        Ok(session)
    }
}
