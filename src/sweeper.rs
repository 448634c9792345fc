//! Periodic eviction sweep.
//!
//! Per-message eviction only touches the author currently posting and
//! the URL log; an author who goes silent would otherwise sit in memory
//! until they post again. This background task sweeps everything on a
//! fixed cadence so the memory bound holds independently of traffic.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::info;

use crate::detector::DuplicateDetector;

/// Fixed sweep cadence. Intentionally not configurable; it is
/// independent of the detection window.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Spawn the background sweep task.
///
/// Runs until the returned handle is aborted; shutting the engine down
/// is just "stop feeding messages, abort the sweeper". No in-flight
/// sweep needs cancellation since none of it blocks.
pub fn spawn_sweep_task<O>(detector: Arc<DuplicateDetector<O>>) -> JoinHandle<()>
where
    O: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let stats = detector.sweep(Utc::now());
            if stats.removed_anything() {
                info!(
                    url_entries = stats.url_entries_evicted,
                    author_entries = stats.author_entries_evicted,
                    authors = stats.authors_dropped,
                    "eviction sweep reclaimed expired state"
                );
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DetectionConfig;

    #[tokio::test(start_paused = true)]
    async fn sweep_task_reclaims_stale_state_in_background() {
        let detector: Arc<DuplicateDetector<u32>> =
            Arc::new(DuplicateDetector::new(DetectionConfig::default()).unwrap());

        let stale = Utc::now() - chrono::Duration::minutes(30);
        detector.scan(1, "long gone", stale, 100);
        assert_eq!(detector.stats().tracked_authors, 1);

        let handle = spawn_sweep_task(Arc::clone(&detector));
        tokio::time::sleep(SWEEP_INTERVAL + Duration::from_secs(1)).await;

        assert_eq!(detector.stats().tracked_authors, 0);
        handle.abort();
    }
}
