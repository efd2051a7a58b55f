//! メッセージ送信（通知）の実装
//!
//! ## 概要
//!
//! このモジュールは `MessagePusher` trait の具体的な実装を提供します。
//!
//! ## 実装
//!
//! - `sse`: Server-Sent Events ストリームへの配信キューを使った実装

pub mod sse;

pub use sse::SseMessagePusher;
