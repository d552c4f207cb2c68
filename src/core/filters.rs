use crate::core::distance::{haversine_distance, is_within_bounding_box, MAX_MATCH_DISTANCE_MILES};
use crate::models::{ArtistMatchData, BoundingBox, ShowMatchData};

/// Minimum total score for a pair to be stored as a match candidate
pub const MIN_MATCH_SCORE: u8 = 10;

/// Check if an artist is close enough to a venue to be matched
///
/// This is Stage 1 of the pipeline. Pairs with a missing coordinate on either
/// side always pass; the location score then counts as zero.
#[inline]
pub fn is_within_match_distance(artist: &ArtistMatchData, show: &ShowMatchData) -> bool {
    match (
        artist.latitude,
        artist.longitude,
        show.venue_latitude,
        show.venue_longitude,
    ) {
        (Some(artist_lat), Some(artist_lon), Some(venue_lat), Some(venue_lon)) => {
            haversine_distance(artist_lat, artist_lon, venue_lat, venue_lon)
                <= MAX_MATCH_DISTANCE_MILES
        }
        _ => true,
    }
}

/// Cheap rejection before Haversine: false only for artists with coordinates
/// outside the venue's bounding box
#[inline]
pub fn passes_bounding_box(artist: &ArtistMatchData, venue_box: Option<&BoundingBox>) -> bool {
    match (artist.latitude, artist.longitude, venue_box) {
        (Some(lat), Some(lon), Some(bbox)) => is_within_bounding_box(lat, lon, bbox),
        _ => true,
    }
}

/// Check if a score is high enough to persist
#[inline]
pub fn meets_match_threshold(score: u8) -> bool {
    score >= MIN_MATCH_SCORE
}
