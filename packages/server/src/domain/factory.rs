//! 識別子の生成
//!
//! セッショントークン・公開セッション ID・Blob ID を OS の乱数源から生成します。
//! 乱数源が使えない場合でもエラーにはせず、タイムスタンプと
//! プロセス内連番による（推測可能だが一意な）値に退化させます。

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use lantern_shared::time::get_timestamp_millis;
use rand::{TryRngCore, rngs::OsRng};

use super::{
    error::EntropyError,
    value_object::{BlobId, SessionId, SessionToken, Timestamp},
};

const SESSION_TOKEN_BYTES: usize = 32;
const SESSION_ID_BYTES: usize = 8;
const BLOB_SUFFIX_BYTES: usize = 4;

static FALLBACK_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// 乱数源の抽象化（テストで失敗を注入するため）
pub trait EntropySource: Send + Sync {
    fn fill(&self, buf: &mut [u8]) -> Result<(), EntropyError>;
}

/// OS の暗号論的乱数源
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&self, buf: &mut [u8]) -> Result<(), EntropyError> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(|e| EntropyError(e.to_string()))
    }
}

/// 識別子ファクトリ
pub struct IdFactory {
    entropy: Arc<dyn EntropySource>,
}

impl IdFactory {
    pub fn new(entropy: Arc<dyn EntropySource>) -> Self {
        Self { entropy }
    }

    /// OS 乱数源を使うファクトリ
    pub fn system() -> Self {
        Self::new(Arc::new(OsEntropy))
    }

    /// Cookie に保存するセッショントークン（256 bit, base64url）
    pub fn session_token(&self) -> SessionToken {
        match self.random_bytes::<SESSION_TOKEN_BYTES>() {
            Some(bytes) => SessionToken::new(URL_SAFE_NO_PAD.encode(bytes)),
            None => SessionToken::new(format!(
                "{}x{}",
                get_timestamp_millis(),
                next_fallback_sequence()
            )),
        }
    }

    /// 公開セッション ID（64 bit, hex）
    pub fn session_id(&self) -> SessionId {
        match self.random_bytes::<SESSION_ID_BYTES>() {
            Some(bytes) => SessionId::new(hex::encode(bytes)),
            None => SessionId::new(format!(
                "{}x{}",
                get_timestamp_millis(),
                next_fallback_sequence()
            )),
        }
    }

    /// `<unix ミリ秒>-<8 桁 hex>` 形式の Blob ID
    ///
    /// 退化時は `<unix ミリ秒>-x<連番>`。`x` は hex に現れないため正常時の ID と衝突しない。
    pub fn blob_id(&self, now: Timestamp) -> BlobId {
        match self.random_bytes::<BLOB_SUFFIX_BYTES>() {
            Some(bytes) => BlobId::new(format!("{}-{}", now.value(), hex::encode(bytes))),
            None => BlobId::new(format!("{}-x{}", now.value(), next_fallback_sequence())),
        }
    }

    fn random_bytes<const N: usize>(&self) -> Option<[u8; N]> {
        let mut bytes = [0u8; N];
        match self.entropy.fill(&mut bytes) {
            Ok(()) => Some(bytes),
            Err(e) => {
                tracing::warn!("{}; falling back to a sequence-based identifier", e);
                None
            }
        }
    }
}

impl Default for IdFactory {
    fn default() -> Self {
        Self::system()
    }
}

fn next_fallback_sequence() -> u64 {
    FALLBACK_SEQUENCE.fetch_add(1, Ordering::Relaxed)
}
