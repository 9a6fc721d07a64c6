//! UseCase: ブロードキャスト
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - BroadcastUseCase::execute() メソッド
//! - 送信元と異なる表示名を持つ全セッションへの配送
//!
//! ### なぜこのテストが必要か
//! - 除外判定はセッション単位ではなく表示名（Identity）の値で行う
//! - 1 つのピアへの配送失敗が他のピアへの配送を止めないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：送信元以外への配送
//! - エッジケース：同じ表示名の別接続には配送されない
//! - 異常系：書き込みタスクが終了したピア、送信キューが満杯のピアはクローズされ、残りには配送される

use std::sync::Arc;

use crate::domain::{Identity, SessionRegistry};

/// ブロードキャストのユースケース
pub struct BroadcastUseCase {
    /// Registry（データアクセス層の抽象化）
    registry: Arc<dyn SessionRegistry>,
}

impl BroadcastUseCase {
    /// 新しい BroadcastUseCase を作成
    pub fn new(registry: Arc<dyn SessionRegistry>) -> Self {
        Self { registry }
    }

    /// ブロードキャストを実行
    ///
    /// Registry のスナップショットを登録順に走査し、`origin` と表示名が
    /// 一致しない全セッションに `line` をそのまま渡す。
    ///
    /// # Arguments
    ///
    /// * `line` - 配送するフレーム（改行なし）
    /// * `origin` - 送信元の表示名
    ///
    /// # Returns
    ///
    /// 配送キューに積めたピアの数
    pub async fn execute(&self, line: &str, origin: &Identity) -> usize {
        if line.trim().is_empty() {
            return 0;
        }

        tracing::debug!("Broadcasting from '{}': {}", origin, line);

        let snapshot = self.registry.snapshot().await;
        let mut delivered = 0;
        for session in snapshot.iter().filter(|s| s.identity() != origin) {
            match session.send(line) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    // the peer's own connection task tears it down once closed
                    if session.close() {
                        tracing::warn!(
                            "Failed to deliver to '{}' ({}): {}",
                            session.identity(),
                            session.peer_addr(),
                            e
                        );
                    }
                }
            }
        }
        delivered
    }
}
