//! UseCase: イベントストリームの接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectSessionUseCase::execute() メソッド
//! - セッションの配信チャンネル登録
//!
//! ### なぜこのテストが必要か
//! - 同じセッションが再接続した場合、古いストリームが閉じられ新しいストリームだけに配信されることを保証する

use std::sync::Arc;

use crate::domain::{MessagePusher, SessionId, Subscription};

/// イベントストリーム接続のユースケース
pub struct ConnectSessionUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectSessionUseCase {
    /// 新しい ConnectSessionUseCase を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// セッションを配信対象として登録する
    ///
    /// 既に登録済みのセッションは新しい接続に置き換えられる。
    pub async fn execute(&self, session_id: SessionId) -> Subscription {
        let subscription = self.message_pusher.register(session_id).await;
        tracing::info!(
            "Session '{}' connected (connection {}, {} online)",
            subscription.session_id,
            subscription.connection,
            self.message_pusher.registered_count().await
        );
        subscription
    }
}
