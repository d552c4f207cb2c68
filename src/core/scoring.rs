use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::HashSet;

use crate::core::distance::{haversine_distance, MAX_MATCH_DISTANCE_MILES};
use crate::models::{
    ArtistMatchData, AvailabilityPreference, MatchScoreBreakdown, ScoringWeights, ShowMatchData,
};

/// Draw/capacity ratios in this band fill the room without overselling it
const SWEET_SPOT_MIN: f64 = 0.6;
const SWEET_SPOT_MAX: f64 = 0.9;

/// Center of the undersell decay
const IDEAL_RATIO: f64 = 0.75;

/// Availability score for preferences that cannot be checked against a weekday.
/// Exact-date matching is not implemented.
pub const NEUTRAL_AVAILABILITY_SCORE: f64 = 0.5;

/// Compensation score for every show. Artist compensation preferences are not
/// modeled yet.
pub const NEUTRAL_COMPENSATION_SCORE: f64 = 0.5;

/// Calculate a match score (0-100) for an artist/show pair
///
/// Scoring formula:
/// score = round((
///     genre_score * 0.30 +          # Jaccard similarity of genre sets
///     location_score * 0.25 +       # Linear decay to 0 at 150 miles
///     capacity_draw_score * 0.20 +  # Draw fills 60-90% of the room
///     availability_score * 0.15 +   # Show night fits the artist's preference
///     compensation_score * 0.10     # Neutral for now
/// ) * 100)
pub fn compute_match_score(artist: &ArtistMatchData, show: &ShowMatchData) -> u8 {
    total_score(&score_breakdown(artist, show))
}

/// Compute the five component scores for an artist/show pair
pub fn score_breakdown(artist: &ArtistMatchData, show: &ShowMatchData) -> MatchScoreBreakdown {
    MatchScoreBreakdown {
        genre: genre_score(&artist.genres, &show.genres),
        location: location_score(
            artist.latitude,
            artist.longitude,
            show.venue_latitude,
            show.venue_longitude,
        ),
        capacity_draw: capacity_draw_score(artist.draw_estimate, Some(show.venue_capacity)),
        availability: availability_score(artist.availability_preference, show.show_date),
        compensation: compensation_score(show.compensation_type.as_deref()),
    }
}

/// Combine a breakdown with the default weights into an integer score (0-100)
pub fn total_score(breakdown: &MatchScoreBreakdown) -> u8 {
    weighted_total(breakdown, &ScoringWeights::default())
}

/// Combine a breakdown with explicit weights into an integer score (0-100),
/// rounding halves up
pub fn weighted_total(breakdown: &MatchScoreBreakdown, weights: &ScoringWeights) -> u8 {
    let raw = weights.apply(breakdown) * 100.0;
    (raw + 0.5).floor().clamp(0.0, 100.0) as u8
}

/// Jaccard similarity of two genre sets (0-1)
///
/// Returns 0.0 when either set is empty: no genre data means no match.
pub fn genre_score<S: AsRef<str>>(a: &[S], b: &[S]) -> f64 {
    let a: HashSet<&str> = a.iter().map(AsRef::as_ref).collect();
    let b: HashSet<&str> = b.iter().map(AsRef::as_ref).collect();

    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let intersection = a.intersection(&b).count() as f64;
    let union = a.union(&b).count() as f64;

    intersection / union
}

/// Calculate location score (0-1)
///
/// Linear decay from 1.0 when co-located to 0.0 at the match cutoff. Missing
/// coordinates on either side score 0.0.
pub fn location_score(
    artist_lat: Option<f64>,
    artist_lon: Option<f64>,
    venue_lat: Option<f64>,
    venue_lon: Option<f64>,
) -> f64 {
    let (Some(artist_lat), Some(artist_lon), Some(venue_lat), Some(venue_lon)) =
        (artist_lat, artist_lon, venue_lat, venue_lon)
    else {
        return 0.0;
    };

    let distance = haversine_distance(artist_lat, artist_lon, venue_lat, venue_lon);
    if !distance.is_finite() || distance >= MAX_MATCH_DISTANCE_MILES {
        return 0.0;
    }

    1.0 - distance / MAX_MATCH_DISTANCE_MILES
}

/// Calculate capacity/draw fit (0-1)
///
/// Overselling the room is penalised twice as steeply as underselling it.
pub fn capacity_draw_score(draw: Option<u32>, capacity: Option<u32>) -> f64 {
    let (Some(draw), Some(capacity)) = (draw, capacity) else {
        return 0.0;
    };
    if draw == 0 || capacity == 0 {
        return 0.0;
    }

    let ratio = draw as f64 / capacity as f64;

    if (SWEET_SPOT_MIN..=SWEET_SPOT_MAX).contains(&ratio) {
        return 1.0;
    }

    if ratio > 1.0 {
        (1.0 - (ratio - 1.0) * 2.0).max(0.0)
    } else {
        (1.0 - (ratio - IDEAL_RATIO).abs() * 2.0).max(0.0)
    }
}

/// Calculate availability score from the show's weekday
pub fn availability_score(preference: AvailabilityPreference, show_date: NaiveDate) -> f64 {
    let weekday = show_date.weekday();

    match preference {
        AvailabilityPreference::AnyNight => 1.0,
        AvailabilityPreference::Weekends => {
            if is_weekend_night(weekday) {
                1.0
            } else {
                0.0
            }
        }
        AvailabilityPreference::Weeknights => {
            if is_weekend_night(weekday) {
                0.0
            } else {
                1.0
            }
        }
        AvailabilityPreference::SpecificDates | AvailabilityPreference::Other => {
            NEUTRAL_AVAILABILITY_SCORE
        }
    }
}

/// Friday through Sunday
#[inline]
fn is_weekend_night(weekday: Weekday) -> bool {
    matches!(weekday, Weekday::Fri | Weekday::Sat | Weekday::Sun)
}

/// Calculate compensation score; constant until preferences are modeled
#[inline]
pub fn compensation_score(_compensation_type: Option<&str>) -> f64 {
    NEUTRAL_COMPENSATION_SCORE
}
