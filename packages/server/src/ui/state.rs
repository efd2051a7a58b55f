//! Shared application state.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::usecase::{
    AnnouncePresenceUseCase, ConnectSessionUseCase, DisconnectSessionUseCase, GetImageUseCase,
    ResolveSessionUseCase, SendMessageUseCase, SetNicknameUseCase, UploadImageUseCase,
};

/// Shared application state
pub struct AppState {
    /// ResolveSessionUseCase（Cookie からのセッション解決）
    pub resolve_session_usecase: Arc<ResolveSessionUseCase>,
    /// SendMessageUseCase（メッセージ送信・コマンド実行）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// SetNicknameUseCase（ニックネーム設定）
    pub set_nickname_usecase: Arc<SetNicknameUseCase>,
    /// UploadImageUseCase（画像アップロード）
    pub upload_image_usecase: Arc<UploadImageUseCase>,
    /// GetImageUseCase（画像取得）
    pub get_image_usecase: Arc<GetImageUseCase>,
    /// ConnectSessionUseCase（イベントストリームの接続）
    pub connect_session_usecase: Arc<ConnectSessionUseCase>,
    /// DisconnectSessionUseCase（イベントストリームの切断）
    pub disconnect_session_usecase: Arc<DisconnectSessionUseCase>,
    /// AnnouncePresenceUseCase（入室・退室の通知）
    pub presence_usecase: Arc<AnnouncePresenceUseCase>,
    /// Cancelled on server shutdown; ends open event streams
    pub shutdown: CancellationToken,
}
