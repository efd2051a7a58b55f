//! UseCase: 入室・退室の通知
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - AnnouncePresenceUseCase::join() / leave() メソッド
//!
//! ### なぜこのテストが必要か
//! - 入室・退室の通知文面（ID とニックネームの並び順が異なる）を保証する
//! - ニックネームはエスケープされて配信される

use std::sync::Arc;

use crate::domain::{
    ChatMessage, DeliveryReport, MessagePusher, SessionId, SessionRepository, escape_markup,
};

/// 入室・退室通知のユースケース
pub struct AnnouncePresenceUseCase {
    sessions: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl AnnouncePresenceUseCase {
    /// 新しい AnnouncePresenceUseCase を作成
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            sessions,
            message_pusher,
        }
    }

    /// 入室を全員に通知する
    pub async fn join(&self, session_id: &SessionId) -> DeliveryReport {
        let nickname = self.sessions.nickname(session_id).await;
        tracing::info!("Session '{}' ({}) joined", session_id, nickname);
        let text = format!(
            "{} ([{}]) has joined the room",
            session_id,
            escape_markup(nickname.as_str())
        );
        self.message_pusher
            .broadcast(&ChatMessage::app_notice(text))
            .await
    }

    /// 退室を全員に通知する
    pub async fn leave(&self, session_id: &SessionId) -> DeliveryReport {
        let nickname = self.sessions.nickname(session_id).await;
        tracing::info!("Session '{}' ({}) left", session_id, nickname);
        let text = format!(
            "[{}] ({}) has left the room",
            escape_markup(nickname.as_str()),
            session_id
        );
        self.message_pusher
            .broadcast(&ChatMessage::app_notice(text))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MockMessagePusher, Nickname},
        infrastructure::repository::InMemorySessionRepository,
    };

    #[tokio::test]
    async fn test_join_announces_id_then_nickname() {
        // テスト項目: 入室通知は "<id> ([<nickname>]) has joined the room"
        // given (前提条件):
        let sessions = Arc::new(InMemorySessionRepository::default());
        let id = sessions.resolve(None).await.id;
        let expected = format!("{} ([anonymous]) has joined the room", id);
        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_broadcast()
            .withf(move |message| {
                message.from_app() && !message.is_private() && message.content() == expected
            })
            .times(1)
            .returning(|_| DeliveryReport {
                delivered: 3,
                dropped: 0,
            });
        let usecase = AnnouncePresenceUseCase::new(sessions, Arc::new(pusher));

        // when (操作):
        let report = usecase.join(&id).await;

        // then (期待する結果):
        assert_eq!(report.delivered, 3);
    }

    #[tokio::test]
    async fn test_leave_announces_escaped_nickname_then_id() {
        // テスト項目: 退室通知は "[<nickname>] (<id>) has left the room"（ニックネームはエスケープ）
        // given (前提条件):
        let sessions = Arc::new(InMemorySessionRepository::default());
        let id = sessions.resolve(None).await.id;
        sessions
            .set_nickname(&id, Nickname::new("<b>bob</b>").unwrap())
            .await
            .unwrap();
        let expected = format!("[&lt;b&gt;bob&lt;/b&gt;] ({}) has left the room", id);
        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_broadcast()
            .withf(move |message| message.content() == expected)
            .times(1)
            .returning(|_| DeliveryReport::default());
        let usecase = AnnouncePresenceUseCase::new(sessions, Arc::new(pusher));

        // when (操作) / then (期待する結果):
        usecase.leave(&id).await;
    }
}
