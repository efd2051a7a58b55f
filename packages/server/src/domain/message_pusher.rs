//! MessagePusher trait 定義
//!
//! セッション ID と配信チャンネルの対応（Registration）を管理し、
//! ブロードキャスト / ユニキャストを行うインターフェース。
//!
//! 配信はベストエフォートです。送信は決してブロックせず、
//! 受信側のキューが満杯ならそのメッセージはその受信者に対してだけ破棄されます。

use std::fmt;

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ChatMessage, SessionId};

/// クライアントへの配信キュー（シリアライズ済みのフレームを運ぶ）
pub type PusherChannel = mpsc::Sender<String>;

/// Registration ごとに一意な接続番号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// `register` が返す受信側ハンドル
#[derive(Debug)]
pub struct Subscription {
    pub session_id: SessionId,
    pub connection: ConnectionId,
    pub receiver: mpsc::Receiver<String>,
}

/// ブロードキャストの配信結果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// キューに積めた受信者数
    pub delivered: usize,
    /// キュー満杯・切断済みで破棄した受信者数
    pub dropped: usize,
}

/// MessagePusher trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 配信チャンネルを作成して登録する。既存の登録は置き換えられ、古いチャンネルは閉じられる
    async fn register(&self, session_id: SessionId) -> Subscription;

    /// 登録を削除する（未登録なら何もしない）
    async fn unregister(&self, session_id: &SessionId);

    /// 現在の登録が `connection` の場合のみ削除する
    ///
    /// ストリーム終了時に使用し、置き換え後の新しい登録を消さないようにする。
    async fn unregister_connection(&self, session_id: &SessionId, connection: ConnectionId)
    -> bool;

    /// 登録中の全セッションに配信する
    async fn broadcast(&self, message: &ChatMessage) -> DeliveryReport;

    /// 指定セッションにだけ配信する。未登録（オフライン）なら何もせず false
    async fn unicast(&self, session_id: &SessionId, message: &ChatMessage) -> bool;

    /// 登録中のセッション数
    async fn registered_count(&self) -> usize;
}
