//! UseCase: イベントストリームの切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectSessionUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 再接続後に古いストリームが終了しても、新しい接続の登録が消えないことを保証する
//! - 同じ接続の二重の切断が無害であることを保証する

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, SessionId};

/// イベントストリーム切断のユースケース
pub struct DisconnectSessionUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectSessionUseCase {
    /// 新しい DisconnectSessionUseCase を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// 接続の登録を解除する
    ///
    /// # Returns
    ///
    /// `connection` が現在の登録だった場合のみ true（置き換え済み・解除済みなら false）
    pub async fn execute(&self, session_id: &SessionId, connection: ConnectionId) -> bool {
        let removed = self
            .message_pusher
            .unregister_connection(session_id, connection)
            .await;
        if removed {
            tracing::info!(
                "Session '{}' disconnected (connection {})",
                session_id,
                connection
            );
        } else {
            tracing::debug!(
                "Connection {} of session '{}' was already replaced or removed",
                connection,
                session_id
            );
        }
        removed
    }
}
