//! UseCase: 退室（teardown）処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveSessionUseCase::execute() メソッド
//! - Registry からの削除、退室通知、セッションのクローズ
//!
//! ### なぜこのテストが必要か
//! - teardown は読み込み失敗・書き込み失敗・シャットダウンの複数経路から呼ばれる
//! - 何度呼ばれても退室通知は 1 回だけであることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：登録済みセッションの退室と通知
//! - エッジケース：2 回目の teardown（通知なし）
//! - エッジケース：未登録セッションの teardown（通知なし）

use std::sync::Arc;

use crate::domain::{Session, SessionRegistry, leave_notice};

use super::broadcast::BroadcastUseCase;

/// 退室のユースケース
pub struct LeaveSessionUseCase {
    /// Registry（データアクセス層の抽象化）
    registry: Arc<dyn SessionRegistry>,
}

impl LeaveSessionUseCase {
    /// 新しい LeaveSessionUseCase を作成
    pub fn new(registry: Arc<dyn SessionRegistry>) -> Self {
        Self { registry }
    }

    /// 退室を実行
    ///
    /// # Returns
    ///
    /// 今回の呼び出しで Registry から削除された場合 `true`
    pub async fn execute(&self, session: &Arc<Session>) -> bool {
        // 1. Registry から削除（既に削除済みなら何もしない）
        let removed = self.registry.remove(session.id()).await;

        // 2. 実際に削除された場合のみ退室通知
        if removed {
            tracing::info!(
                "User '{}' left the chat. Remaining users: {}",
                session.identity(),
                self.registry.count().await
            );
            let notice = leave_notice(session.identity());
            BroadcastUseCase::new(self.registry.clone())
                .execute(&notice, session.identity())
                .await;
        }

        // 3. ストリームを解放
        session.close();
        removed
    }
}
