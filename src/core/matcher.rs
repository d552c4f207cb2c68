use crate::models::{ArtistMatchData, ArtistRecord, MatchScoreBreakdown, ScoredCandidate, ShowMatchData};
use crate::core::{
    distance::{calculate_bounding_box, MAX_MATCH_DISTANCE_MILES},
    filters::{is_within_match_distance, meets_match_threshold, passes_bounding_box},
    scoring::{score_breakdown, total_score},
};

/// Result of evaluating one show against a roster of artists
#[derive(Debug, Default)]
pub struct Evaluation {
    /// Qualifying candidates, best score first
    pub candidates: Vec<ScoredCandidate>,
    pub total_candidates: usize,
    pub skipped_distance: usize,
    pub below_threshold: usize,
}

/// Main matching orchestrator - implements the candidate pipeline
///
/// # Pipeline Stages
/// 1. Geographic pre-filter (bounding box, then Haversine cutoff)
/// 2. Component scoring
/// 3. Weighted total and minimum threshold
///
/// Weights are fixed, so a pair scores the same here as through
/// `compute_match_score`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Matcher;

impl Matcher {
    pub fn new() -> Self {
        Self
    }

    /// Score a single pair
    pub fn score(&self, artist: &ArtistMatchData, show: &ShowMatchData) -> (u8, MatchScoreBreakdown) {
        let breakdown = score_breakdown(artist, show);
        (total_score(&breakdown), breakdown)
    }

    /// Evaluate every artist on the roster against a show
    ///
    /// # Arguments
    /// * `show` - The show being matched
    /// * `artists` - The full artist roster
    ///
    /// # Returns
    /// Evaluation with the candidates that cleared the distance cutoff and
    /// the score threshold, plus counters for the ones that did not
    pub fn evaluate(&self, show: &ShowMatchData, artists: &[ArtistRecord]) -> Evaluation {
        let venue_box = match (show.venue_latitude, show.venue_longitude) {
            (Some(lat), Some(lon)) => Some(calculate_bounding_box(lat, lon, MAX_MATCH_DISTANCE_MILES)),
            _ => None,
        };

        let mut evaluation = Evaluation {
            total_candidates: artists.len(),
            ..Evaluation::default()
        };

        for artist in artists {
            // Stage 1: Geographic pre-filter
            if !passes_bounding_box(&artist.profile, venue_box.as_ref())
                || !is_within_match_distance(&artist.profile, show)
            {
                evaluation.skipped_distance += 1;
                continue;
            }

            // Stage 2 & 3: Score and threshold
            let (score, breakdown) = self.score(&artist.profile, show);
            if !meets_match_threshold(score) {
                evaluation.below_threshold += 1;
                continue;
            }

            evaluation.candidates.push(ScoredCandidate {
                artist_id: artist.id,
                score,
                breakdown,
            });
        }

        // Sort by score (descending), ties by artist id for a stable order
        evaluation
            .candidates
            .sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.artist_id.cmp(&b.artist_id)));

        evaluation
    }
}
