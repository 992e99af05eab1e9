use std::sync::Arc;
use std::time::Duration;

use crate::pos::sessions::PosSessionStore;

/// Interval between idle-session sweeps (in seconds).
const SWEEP_INTERVAL_SECS: u64 = 60;

/// Spawn a background task that periodically evicts POS sessions idle for
/// longer than `max_idle`.
///
/// The task runs for the life of the process. The returned `JoinHandle` can
/// be used to abort it during shutdown.
pub fn start_sweeper(
    store: Arc<PosSessionStore>,
    max_idle: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(SWEEP_INTERVAL_SECS));

        loop {
            interval.tick().await;
            let evicted = store.evict_idle(max_idle).await;
            if evicted > 0 {
                let remaining = store.count().await;
                tracing::info!(evicted, remaining, "Evicted idle POS sessions");
            } else {
                tracing::debug!("POS session sweep found nothing idle");
            }
        }
    })
}
