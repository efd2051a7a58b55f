//! InMemory Blob Repository 実装
//!
//! アップロード画像を一定時間だけ保持します。期限切れの判定は `sweep` でのみ行い、
//! `get` は期限を確認しません（定期削除の間隔が古いデータの残存時間の上限になる）。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use bytes::Bytes;
use lantern_shared::time::{Clock, get_timestamp_millis};
use tokio::sync::Mutex;

use crate::domain::{BlobId, BlobRepository, IdFactory, Timestamp};

/// バイト列と有効期限（同じレコードに持つため常に同時に削除される）
struct BlobRecord {
    bytes: Bytes,
    expires_at: Timestamp,
}

/// インメモリ Blob Repository 実装
pub struct InMemoryBlobRepository {
    blobs: Mutex<HashMap<BlobId, BlobRecord>>,
    ids: IdFactory,
    clock: Arc<dyn Clock>,
    ttl_millis: i64,
}

impl InMemoryBlobRepository {
    /// 既定の保持期間（1 分）
    pub const DEFAULT_TTL_MILLIS: i64 = 60_000;

    /// 新しい InMemoryBlobRepository を作成
    pub fn new(ids: IdFactory, clock: Arc<dyn Clock>, ttl_millis: i64) -> Self {
        Self {
            blobs: Mutex::new(HashMap::new()),
            ids,
            clock,
            ttl_millis,
        }
    }
}

#[async_trait]
impl BlobRepository for InMemoryBlobRepository {
    async fn put(&self, bytes: Bytes) -> BlobId {
        let now = Timestamp::new(self.clock.now_millis());
        let record = BlobRecord {
            bytes,
            expires_at: now.add_millis(self.ttl_millis),
        };

        // ID の接頭辞は Unix 時刻、有効期限は clock の読みで管理する
        let issued_at = Timestamp::new(get_timestamp_millis());
        let mut blobs = self.blobs.lock().await;
        let id = loop {
            let candidate = self.ids.blob_id(issued_at);
            if !blobs.contains_key(&candidate) {
                break candidate;
            }
        };
        tracing::debug!(
            "Stored blob '{}' ({} bytes, expires at {})",
            id,
            record.bytes.len(),
            record.expires_at
        );
        blobs.insert(id.clone(), record);
        id
    }

    async fn get(&self, id: &BlobId) -> Option<Bytes> {
        let blobs = self.blobs.lock().await;
        blobs.get(id).map(|record| record.bytes.clone())
    }

    async fn sweep(&self, now: Timestamp) -> usize {
        let mut blobs = self.blobs.lock().await;
        let before = blobs.len();
        blobs.retain(|_, record| record.expires_at > now);
        before - blobs.len()
    }

    async fn count(&self) -> usize {
        self.blobs.lock().await.len()
    }
}
