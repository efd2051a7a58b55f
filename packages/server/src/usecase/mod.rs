//! UseCase 層
//!
//! HTTP ハンドラから呼ばれるアプリケーションの操作。
//! Domain 層の trait（Repository / MessagePusher）だけに依存します。

pub mod connect_session;
pub mod disconnect_session;
pub mod error;
pub mod get_image;
pub mod presence;
pub mod process_command;
pub mod resolve_session;
pub mod send_message;
pub mod set_nickname;
pub mod upload_image;

pub use connect_session::ConnectSessionUseCase;
pub use disconnect_session::DisconnectSessionUseCase;
pub use error::{SendMessageError, SetNicknameError, UploadImageError};
pub use get_image::GetImageUseCase;
pub use presence::AnnouncePresenceUseCase;
pub use process_command::{CommandReply, ProcessCommandUseCase};
pub use resolve_session::ResolveSessionUseCase;
pub use send_message::{SendMessageUseCase, SendOutcome};
pub use set_nickname::SetNicknameUseCase;
pub use upload_image::UploadImageUseCase;
