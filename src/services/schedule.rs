//! Periodic match sweep.
//!
//! Spawned from `main` when `matching.sweep_interval_secs` is set. Runs
//! `generate_all_matches` on a fixed interval using `tokio::time::interval`
//! until the shutdown token fires.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::services::generator::MatchGenerator;

/// Run the sweep loop. The first sweep starts immediately.
pub async fn run(generator: Arc<MatchGenerator>, every: Duration, cancel: CancellationToken) {
    tracing::info!("Scheduled match sweep started (every {}s)", every.as_secs());

    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Scheduled match sweep stopping");
                break;
            }
            _ = interval.tick() => {
                match generator.generate_all_matches_with_cancel(&cancel).await {
                    Ok(summary) => {
                        tracing::debug!("Scheduled sweep processed {} shows", summary.processed);
                    }
                    Err(e) => {
                        tracing::error!("Scheduled sweep failed: {}", e);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Matcher;
    use crate::services::memory::InMemoryStore;

    #[tokio::test]
    async fn test_stops_on_cancel() {
        let store = Arc::new(InMemoryStore::new());
        let generator = Arc::new(MatchGenerator::new(store, Matcher::default(), Duration::ZERO, 1));
        let cancel = CancellationToken::new();

        cancel.cancel();

        tokio::time::timeout(Duration::from_secs(5), run(generator, Duration::from_secs(3600), cancel))
            .await
            .expect("sweep loop did not stop");
    }
}
