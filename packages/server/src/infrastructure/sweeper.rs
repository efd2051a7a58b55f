//! Background eviction of expired blobs.

use std::{sync::Arc, time::Duration};

use lantern_shared::time::Clock;
use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::domain::{BlobRepository, Timestamp};

/// Spawn a task that sweeps `blobs` every `period` until `shutdown` is cancelled.
///
/// The task only touches the repository through `sweep`, so uploads and reads
/// contend with it for no longer than one sweep.
pub fn spawn_blob_sweeper(
    blobs: Arc<dyn BlobRepository>,
    clock: Arc<dyn Clock>,
    period: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        tracing::info!("Blob sweeper started (every {:?})", period);
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    let now = Timestamp::new(clock.now_millis());
                    let removed = blobs.sweep(now).await;
                    if removed > 0 {
                        tracing::info!("Swept {} expired blob(s)", removed);
                    }
                }
            }
        }
        tracing::info!("Blob sweeper stopped");
    })
}
