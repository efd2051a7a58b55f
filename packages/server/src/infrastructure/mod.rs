//! Infrastructure 層
//!
//! ドメイン層の trait の具体的な実装（インメモリ Repository、SSE 向け MessagePusher）と、
//! 配信フレームの DTO、Blob の定期削除タスクを提供します。

pub mod dto;
pub mod message_pusher;
pub mod repository;
pub mod sweeper;
