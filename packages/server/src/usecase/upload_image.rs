//! UseCase: 画像アップロード処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - UploadImageUseCase::execute() メソッド
//! - Blob の保存と、画像メッセージのブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 画像メッセージはアップロードしたセッションを author として全員に届く必要がある
//! - 空のファイルや上限を超えるファイルは保存も配信もされないことを保証する

use std::sync::Arc;

use bytes::Bytes;

use crate::domain::{
    BlobId, BlobRepository, ChatMessage, MessagePusher, SessionId, SessionRepository,
};

use super::error::UploadImageError;

/// 画像アップロードのユースケース
pub struct UploadImageUseCase {
    sessions: Arc<dyn SessionRepository>,
    blobs: Arc<dyn BlobRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    /// 受け付ける画像の最大バイト数（これちょうどは許可）
    max_bytes: usize,
}

impl UploadImageUseCase {
    /// 新しい UploadImageUseCase を作成
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        blobs: Arc<dyn BlobRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        max_bytes: usize,
    ) -> Self {
        Self {
            sessions,
            blobs,
            message_pusher,
            max_bytes,
        }
    }

    /// 画像を保存して全員に通知する
    ///
    /// # Returns
    ///
    /// * `Ok(BlobId)` - 保存した画像の ID
    /// * `Err(UploadImageError)` - 空のファイル、または `max_bytes` を超えるファイル
    pub async fn execute(
        &self,
        uploader: &SessionId,
        bytes: Bytes,
    ) -> Result<BlobId, UploadImageError> {
        if bytes.is_empty() {
            return Err(UploadImageError::EmptyImage);
        }
        if bytes.len() > self.max_bytes {
            return Err(UploadImageError::TooLarge {
                limit: self.max_bytes,
            });
        }

        let size = bytes.len();
        let id = self.blobs.put(bytes).await;
        tracing::info!("Session '{}' uploaded image '{}' ({} bytes)", uploader, id, size);

        let author = self.sessions.author(uploader).await;
        self.message_pusher
            .broadcast(&ChatMessage::user_image(author, &id))
            .await;

        Ok(id)
    }
}
