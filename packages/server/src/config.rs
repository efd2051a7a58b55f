//! Runtime configuration for the relay server.

use std::time::Duration;

use crate::{
    domain::RateLimitPolicy,
    infrastructure::{message_pusher::SseMessagePusher, repository::InMemoryBlobRepository},
};

/// Server configuration.
///
/// The binary fills this from command-line flags and environment variables;
/// tests usually start from `ServerConfig::default()` and override a field or two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// How long an uploaded image stays retrievable (until the next sweep after expiry)
    pub blob_ttl: Duration,
    /// Period of the background blob sweep
    pub sweep_interval: Duration,
    /// Rate limiter window and threshold
    pub rate_limit: RateLimitPolicy,
    /// Per-stream outbound queue capacity
    pub queue_capacity: usize,
    /// Largest accepted `image` field on `/upload-image`
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(30);
    pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 << 20;
    /// Room left in the request body for multipart boundaries and part headers
    pub const MULTIPART_OVERHEAD_BYTES: usize = 64 << 10;

    pub fn blob_ttl_millis(&self) -> i64 {
        i64::try_from(self.blob_ttl.as_millis()).unwrap_or(i64::MAX)
    }

    /// Request body limit for `/upload-image`
    ///
    /// The field itself is checked against `max_upload_bytes` after parsing.
    pub fn upload_body_limit(&self) -> usize {
        self.max_upload_bytes
            .saturating_add(Self::MULTIPART_OVERHEAD_BYTES)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            blob_ttl: Duration::from_millis(InMemoryBlobRepository::DEFAULT_TTL_MILLIS as u64),
            sweep_interval: Self::DEFAULT_SWEEP_INTERVAL,
            rate_limit: RateLimitPolicy::default(),
            queue_capacity: SseMessagePusher::DEFAULT_QUEUE_CAPACITY,
            max_upload_bytes: Self::DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // テスト項目: 既定値が CLI の既定値と一致する
        // given (前提条件) / when (操作):
        let config = ServerConfig::default();

        // then (期待する結果):
        assert_eq!(config.blob_ttl, Duration::from_secs(60));
        assert_eq!(config.blob_ttl_millis(), 60_000);
        assert_eq!(config.sweep_interval, Duration::from_secs(30));
        assert_eq!(config.rate_limit.window_millis(), 2_000);
        assert_eq!(config.rate_limit.threshold(), 5);
        assert_eq!(config.queue_capacity, 64);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_upload_body_limit_leaves_room_for_multipart_framing() {
        // テスト項目: リクエスト本文の上限は画像の上限より multipart の枠の分だけ大きい
        // given (前提条件):
        let config = ServerConfig {
            max_upload_bytes: 1_000,
            ..ServerConfig::default()
        };

        // when (操作):
        let limit = config.upload_body_limit();

        // then (期待する結果):
        assert_eq!(limit, 1_000 + 64 * 1024);
        assert_eq!(
            ServerConfig {
                max_upload_bytes: usize::MAX,
                ..ServerConfig::default()
            }
            .upload_body_limit(),
            usize::MAX
        );
    }
}
