//! UseCase: 画像取得処理

use std::sync::Arc;

use bytes::Bytes;

use crate::domain::{BlobId, BlobRepository};

/// 画像取得のユースケース
pub struct GetImageUseCase {
    blobs: Arc<dyn BlobRepository>,
}

impl GetImageUseCase {
    /// 新しい GetImageUseCase を作成
    pub fn new(blobs: Arc<dyn BlobRepository>) -> Self {
        Self { blobs }
    }

    /// 画像のバイト列を取得する（未保存、または削除済みなら None）
    pub async fn execute(&self, id: &str) -> Option<Bytes> {
        self.blobs.get(&BlobId::new(id)).await
    }
}
