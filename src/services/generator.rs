use futures::{future, stream, StreamExt};
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use std::pin::pin;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::core::Matcher;
use crate::models::ArtistRecord;
use crate::services::store::{MatchStore, StoreError, UpsertOutcome};

const ROSTER_KEY: &str = "roster";

/// Errors that stop the sweep for one show, or for the whole run
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("failed to load show {show_id}: {source}")]
    LoadShow {
        show_id: Uuid,
        #[source]
        source: StoreError,
    },

    #[error("failed to load artist roster: {0}")]
    LoadRoster(Arc<StoreError>),

    #[error("failed to list open shows: {0}")]
    ListShows(#[source] StoreError),
}

/// Outcome of sweeping a single show
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowSweepReport {
    pub show_id: Uuid,
    /// True when the show is missing or not open; nothing was scored
    pub skipped: bool,
    pub artists_considered: usize,
    pub skipped_distance: usize,
    pub below_threshold: usize,
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
}

impl ShowSweepReport {
    fn skipped(show_id: Uuid) -> Self {
        Self {
            show_id,
            skipped: true,
            ..Self::default()
        }
    }
}

/// Outcome of sweeping every open show
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepSummary {
    /// Shows the sweep attempted
    pub processed: usize,
    /// Shows whose sweep returned an error
    pub failed: usize,
    /// True if the run stopped early on cancellation
    pub cancelled: bool,
}

/// Match generation sweep
///
/// Scores every artist against open shows and upserts the candidates that
/// clear the distance cutoff and the score threshold. Existing match records
/// only ever get their score rewritten, so statuses set by artists and venues
/// survive re-runs.
pub struct MatchGenerator {
    store: Arc<dyn MatchStore>,
    matcher: Matcher,
    roster: Option<Cache<&'static str, Arc<Vec<ArtistRecord>>>>,
    concurrency: usize,
}

impl MatchGenerator {
    /// Create a new generator
    ///
    /// # Arguments
    /// * `store` - Persistence collaborator
    /// * `matcher` - Scoring pipeline
    /// * `roster_ttl` - How long a loaded artist roster is reused; zero disables reuse
    /// * `concurrency` - Shows swept in parallel by `generate_all_matches`
    pub fn new(
        store: Arc<dyn MatchStore>,
        matcher: Matcher,
        roster_ttl: Duration,
        concurrency: usize,
    ) -> Self {
        let roster = (!roster_ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(1)
                .time_to_live(roster_ttl)
                .build()
        });

        Self {
            store,
            matcher,
            roster,
            concurrency: concurrency.max(1),
        }
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Drop the cached roster so the next sweep reloads artists
    pub async fn invalidate_roster(&self) {
        if let Some(cache) = &self.roster {
            cache.invalidate(ROSTER_KEY).await;
        }
    }

    async fn load_roster(&self) -> Result<Arc<Vec<ArtistRecord>>, SweepError> {
        let store = Arc::clone(&self.store);
        let load = async move { store.list_artists().await.map(Arc::new) };

        match &self.roster {
            Some(cache) => cache
                .try_get_with(ROSTER_KEY, load)
                .await
                .map_err(SweepError::LoadRoster),
            None => load.await.map_err(|e| SweepError::LoadRoster(Arc::new(e))),
        }
    }

    /// Recompute and persist matches for one show against a freshly loaded
    /// roster
    ///
    /// A missing show or one that is not open is a no-op. Failures writing
    /// individual matches are logged and counted; the rest of the show is
    /// still processed.
    pub async fn generate_matches_for_show(&self, show_id: Uuid) -> Result<ShowSweepReport, SweepError> {
        self.invalidate_roster().await;
        self.sweep_show(show_id).await
    }

    /// Single-show sweep sharing whatever roster is cached
    async fn sweep_show(&self, show_id: Uuid) -> Result<ShowSweepReport, SweepError> {
        let show = match self.store.get_show(show_id).await {
            Ok(Some(show)) if show.is_open() => show,
            Ok(Some(show)) => {
                tracing::debug!("Skipping show {}: status {:?}", show_id, show.status);
                return Ok(ShowSweepReport::skipped(show_id));
            }
            Ok(None) => {
                tracing::debug!("Skipping show {}: not found", show_id);
                return Ok(ShowSweepReport::skipped(show_id));
            }
            Err(source) => return Err(SweepError::LoadShow { show_id, source }),
        };

        let roster = self.load_roster().await?;
        let evaluation = self.matcher.evaluate(&show.to_match_data(), &roster);

        let mut report = ShowSweepReport {
            show_id,
            skipped: false,
            artists_considered: evaluation.total_candidates,
            skipped_distance: evaluation.skipped_distance,
            below_threshold: evaluation.below_threshold,
            ..ShowSweepReport::default()
        };

        for candidate in &evaluation.candidates {
            match self
                .store
                .upsert_match_score(candidate.artist_id, show_id, candidate.score)
                .await
            {
                Ok(UpsertOutcome::Created) => {
                    report.created += 1;
                    tracing::debug!(
                        "Created match {} -> {} (score {})",
                        candidate.artist_id,
                        show_id,
                        candidate.score
                    );
                }
                Ok(UpsertOutcome::ScoreUpdated) => report.updated += 1,
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(
                        "Failed to store match {} -> {}: {}",
                        candidate.artist_id,
                        show_id,
                        e
                    );
                }
            }
        }

        tracing::info!(
            "Swept show {}: {} artists, {} out of range, {} below threshold, {} created, {} updated, {} failed",
            show_id,
            report.artists_considered,
            report.skipped_distance,
            report.below_threshold,
            report.created,
            report.updated,
            report.failed
        );

        Ok(report)
    }

    /// Recompute matches for every open show
    pub async fn generate_all_matches(&self) -> Result<SweepSummary, SweepError> {
        self.generate_all_matches_with_cancel(&CancellationToken::new()).await
    }

    /// Recompute matches for every open show, dispatching no new shows once
    /// `cancel` fires. Shows already in flight finish.
    pub async fn generate_all_matches_with_cancel(
        &self,
        cancel: &CancellationToken,
    ) -> Result<SweepSummary, SweepError> {
        let show_ids = self
            .store
            .list_open_show_ids()
            .await
            .map_err(SweepError::ListShows)?;

        tracing::info!("Sweeping {} open shows", show_ids.len());

        // One fresh roster shared by every show in this run
        self.invalidate_roster().await;

        let mut summary = SweepSummary::default();
        let mut results = pin!(stream::iter(show_ids)
            .take_while(|_| future::ready(!cancel.is_cancelled()))
            .map(move |show_id| async move { (show_id, self.sweep_show(show_id).await) })
            .buffer_unordered(self.concurrency));

        while let Some((show_id, result)) = results.next().await {
            summary.processed += 1;
            if let Err(e) = result {
                summary.failed += 1;
                tracing::error!("Sweep failed for show {}: {}", show_id, e);
            }
        }

        summary.cancelled = cancel.is_cancelled();

        tracing::info!(
            "Sweep finished: {} shows processed, {} failed{}",
            summary.processed,
            summary.failed,
            if summary.cancelled { " (cancelled)" } else { "" }
        );

        Ok(summary)
    }
}
