//! ドメイン層
//!
//! 値オブジェクト・エンティティ・連投制限ポリシーと、
//! Infrastructure 層が実装する trait（Repository / MessagePusher）を定義します。

pub mod entity;
pub mod error;
pub mod factory;
pub mod markup;
pub mod message_pusher;
pub mod palette;
pub mod rate_limit;
pub mod repository;
pub mod value_object;

pub use entity::{Author, ChatMessage, Member, MessageKind, NicknameChange, Session};
pub use error::{ColorError, EntropyError, NicknameError};
pub use factory::{EntropySource, IdFactory, OsEntropy};
pub use markup::escape_markup;
pub use message_pusher::{
    ConnectionId, DeliveryReport, MessagePusher, PusherChannel, Subscription,
};
pub use rate_limit::{Decision, RateLimitPolicy, SpamState};
pub use repository::{BlobRepository, ResolvedSession, SessionRepository};
pub use value_object::{BlobId, Color, Nickname, SessionId, SessionToken, Timestamp};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
