//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 空メッセージの拒否、連投制限、コマンドへの振り分け、通常メッセージの整形とブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 通常メッセージはエスケープされ、送信者のニックネームと色を付けて全員に届く必要がある
//! - 連投制限に掛かった送信者には private な警告だけが届き、ブロードキャストされないことを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：通常メッセージのブロードキャスト、コマンドの実行
//! - 異常系：空メッセージ、連投

use std::sync::Arc;

use lantern_shared::time::Clock;

use crate::domain::{
    ChatMessage, Decision, DeliveryReport, MessagePusher, SessionId, SessionRepository, Timestamp,
    escape_markup,
};

use super::{
    error::SendMessageError,
    process_command::{CommandReply, ProcessCommandUseCase},
};

/// コマンドの接頭辞
pub const COMMAND_PREFIX: char = ';';

/// 送信処理の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// 通常メッセージとしてブロードキャストした
    Broadcast(DeliveryReport),
    /// コマンドとして処理した
    Command(CommandReply),
}

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// Repository（セッション状態と連投カウンタ）
    sessions: Arc<dyn SessionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// コマンド処理
    commands: Arc<ProcessCommandUseCase>,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        commands: Arc<ProcessCommandUseCase>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sessions,
            message_pusher,
            commands,
            clock,
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `sender` - 送信者のセッション ID
    /// * `raw` - フォームから受け取った未加工のメッセージ
    ///
    /// # Returns
    ///
    /// * `Ok(SendOutcome)` - ブロードキャストまたはコマンド実行の結果
    /// * `Err(SendMessageError)` - 空メッセージまたは連投制限
    pub async fn execute(
        &self,
        sender: &SessionId,
        raw: &str,
    ) -> Result<SendOutcome, SendMessageError> {
        if raw.trim().is_empty() {
            return Err(SendMessageError::EmptyMessage);
        }

        // 1. 連投制限
        let now = Timestamp::new(self.clock.now_millis());
        if self.sessions.admit(sender, now).await == Decision::Throttle {
            tracing::info!("Throttled session '{}'", sender);
            self.message_pusher
                .unicast(
                    sender,
                    &ChatMessage::app_private(SendMessageError::Throttled.to_string()),
                )
                .await;
            return Err(SendMessageError::Throttled);
        }

        // 2. コマンド
        if raw.starts_with(COMMAND_PREFIX) {
            let reply = self.commands.execute(sender, raw).await;
            return Ok(SendOutcome::Command(reply));
        }

        // 3. 通常メッセージ
        let author = self.sessions.author(sender).await;
        let message = ChatMessage::user_text(author, escape_markup(raw));
        let report = self.message_pusher.broadcast(&message).await;
        tracing::debug!(
            "Broadcast message from '{}' to {} session(s) ({} dropped)",
            sender,
            report.delivered,
            report.dropped
        );

        Ok(SendOutcome::Broadcast(report))
    }
}
