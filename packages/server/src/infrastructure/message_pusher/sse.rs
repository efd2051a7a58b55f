//! SSE ストリーム向け MessagePusher 実装
//!
//! ## 責務
//!
//! - セッションごとの配信キュー（有界 `mpsc`）の作成・置き換え・破棄
//! - クライアントへのメッセージ送信（unicast, broadcast）
//!
//! ## 配信ポリシー
//!
//! 送信は `try_send` のみで行い、ロックを保持したまま待機することはありません。
//! 受信者のキューが満杯の場合、そのメッセージはその受信者に対してだけ破棄されます
//! （キューを伸ばさない）。遅い受信者が他の受信者や送信者を止めることはありません。
//!
//! SSE ストリームの生成は UI 層（`ui/handler/sse.rs`）で行われ、
//! この実装は `register` で渡した受信側キューを通じてフレームを届けます。

use std::{
    collections::HashMap,
    sync::atomic::{AtomicU64, Ordering},
};

use async_trait::async_trait;
use tokio::sync::{
    Mutex,
    mpsc::{self, error::TrySendError},
};

use crate::{
    domain::{
        ChatMessage, ConnectionId, DeliveryReport, MessagePusher, PusherChannel, SessionId,
        Subscription,
    },
    infrastructure::dto::conversion::to_frame,
};

/// 現在の登録（接続番号と送信側キュー）
struct Registration {
    connection: ConnectionId,
    sender: PusherChannel,
}

/// SSE を使った MessagePusher 実装
pub struct SseMessagePusher {
    /// 接続中のセッションの配信キュー
    ///
    /// Key: SessionId
    /// Value: Registration
    clients: Mutex<HashMap<SessionId, Registration>>,
    queue_capacity: usize,
    next_connection: AtomicU64,
}

impl SseMessagePusher {
    /// 既定のキュー長
    pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

    /// 新しい SseMessagePusher を作成
    ///
    /// # 引数
    ///
    /// - `queue_capacity`: 受信者ごとのキュー長（0 の場合は 1 として扱う）
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            clients: Mutex::new(HashMap::new()),
            queue_capacity: queue_capacity.max(1),
            next_connection: AtomicU64::new(1),
        }
    }

    fn try_deliver(session_id: &SessionId, sender: &PusherChannel, frame: String) -> bool {
        match sender.try_send(frame) {
            Ok(()) => {
                tracing::debug!("Pushed message to session '{}'", session_id);
                true
            }
            Err(TrySendError::Full(_)) => {
                tracing::warn!(
                    "Queue for session '{}' is full, dropping message",
                    session_id
                );
                false
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!("Queue for session '{}' is closed, skipping", session_id);
                false
            }
        }
    }
}

impl Default for SseMessagePusher {
    fn default() -> Self {
        Self::new(Self::DEFAULT_QUEUE_CAPACITY)
    }
}

#[async_trait]
impl MessagePusher for SseMessagePusher {
    async fn register(&self, session_id: SessionId) -> Subscription {
        let (sender, receiver) = mpsc::channel(self.queue_capacity);
        let connection =
            ConnectionId::new(self.next_connection.fetch_add(1, Ordering::Relaxed));

        let previous = {
            let mut clients = self.clients.lock().await;
            clients.insert(session_id.clone(), Registration { connection, sender })
        };

        // Dropping the only sender closes the replaced stream's queue.
        if let Some(previous) = previous {
            tracing::info!(
                "Session '{}' reconnected; closing previous stream {}",
                session_id,
                previous.connection
            );
        }
        tracing::debug!("Session '{}' registered as {}", session_id, connection);

        Subscription {
            session_id,
            connection,
            receiver,
        }
    }

    async fn unregister(&self, session_id: &SessionId) {
        let mut clients = self.clients.lock().await;
        if clients.remove(session_id).is_some() {
            tracing::debug!("Session '{}' unregistered", session_id);
        }
    }

    async fn unregister_connection(
        &self,
        session_id: &SessionId,
        connection: ConnectionId,
    ) -> bool {
        let mut clients = self.clients.lock().await;
        match clients.get(session_id) {
            Some(current) if current.connection == connection => {
                clients.remove(session_id);
                tracing::debug!("Session '{}' stream {} unregistered", session_id, connection);
                true
            }
            _ => false,
        }
    }

    async fn broadcast(&self, message: &ChatMessage) -> DeliveryReport {
        let frame = match to_frame(message) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!("Failed to serialize message for broadcast: {}", e);
                return DeliveryReport::default();
            }
        };

        let clients = self.clients.lock().await;
        let mut report = DeliveryReport::default();
        for (session_id, registration) in clients.iter() {
            if Self::try_deliver(session_id, &registration.sender, frame.clone()) {
                report.delivered += 1;
            } else {
                report.dropped += 1;
            }
        }
        report
    }

    async fn unicast(&self, session_id: &SessionId, message: &ChatMessage) -> bool {
        let frame = match to_frame(message) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!("Failed to serialize message for '{}': {}", session_id, e);
                return false;
            }
        };

        let clients = self.clients.lock().await;
        match clients.get(session_id) {
            Some(registration) => Self::try_deliver(session_id, &registration.sender, frame),
            None => {
                tracing::debug!("Session '{}' is offline, skipping unicast", session_id);
                false
            }
        }
    }

    async fn registered_count(&self) -> usize {
        self.clients.lock().await.len()
    }
}
