//! UseCase: ニックネーム設定処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SetNicknameUseCase::execute() メソッド
//! - 入力の検証、重複チェック、変更通知のブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 変更通知は全員に届き、旧ニックネームの有無で文面が変わる
//! - 不正なニックネームや他人が使用中のニックネームでは何も配信されないことを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：初回設定、変更
//! - 異常系：空、空白を含む、他のセッションが使用中

use std::sync::Arc;

use crate::domain::{
    ChatMessage, MessagePusher, Nickname, NicknameChange, SessionId, SessionRepository,
    escape_markup,
};

use super::error::SetNicknameError;

/// ニックネーム設定のユースケース
pub struct SetNicknameUseCase {
    /// Repository（セッション状態）
    sessions: Arc<dyn SessionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl SetNicknameUseCase {
    /// 新しい SetNicknameUseCase を作成
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            sessions,
            message_pusher,
        }
    }

    /// ニックネーム設定を実行
    ///
    /// # Arguments
    ///
    /// * `session_id` - 対象のセッション
    /// * `raw` - フォームから受け取った未加工のニックネーム
    ///
    /// # Returns
    ///
    /// * `Ok(NicknameChange)` - 変更前後のニックネーム
    /// * `Err(SetNicknameError)` - 不正な入力、または使用中
    pub async fn execute(
        &self,
        session_id: &SessionId,
        raw: &str,
    ) -> Result<NicknameChange, SetNicknameError> {
        // 1. 値オブジェクトへの変換（空・空白の検証）
        let nickname = Nickname::new(raw)?;

        // 2. Repository で重複チェックと設定
        let change = self.sessions.set_nickname(session_id, nickname).await?;
        tracing::info!(
            "Session '{}' changed nickname to '{}'",
            session_id,
            change.current
        );

        // 3. 全員に通知
        let notice = ChatMessage::app_notice(nickname_change_notice(session_id, &change));
        self.message_pusher.broadcast(&notice).await;

        Ok(change)
    }
}

fn nickname_change_notice(session_id: &SessionId, change: &NicknameChange) -> String {
    let previous = match &change.previous {
        Some(old) => format!("previously [{}]", escape_markup(old.as_str())),
        None => "no previous nicknames".to_string(),
    };
    format!(
        "client {} ({}) changed nickname to [{}]",
        session_id,
        previous,
        escape_markup(change.current.as_str())
    )
}
