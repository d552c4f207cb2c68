// Integration tests for gigmatch

use chrono::NaiveDate;
use gigmatch::core::{compute_match_score, haversine_distance, Matcher, MIN_MATCH_SCORE};
use gigmatch::models::{
    ArtistMatchData, ArtistRecord, AvailabilityPreference, MatchStatus, ShowMatchData, ShowRecord,
    ShowStatus, VenueRecord,
};
use gigmatch::services::{InMemoryStore, MatchGenerator, MatchStore};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

const GREENVILLE: (f64, f64) = (34.8526, -82.3940);
const ASHEVILLE: (f64, f64) = (35.5951, -82.5515);
const NYC: (f64, f64) = (40.7128, -74.0060);
const COLUMBUS: (f64, f64) = (39.9612, -82.9988);
const CHARLOTTE: (f64, f64) = (35.2271, -80.8431);

fn slugs(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn saturday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
}

fn wednesday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 11).unwrap()
}

fn create_artist_data(
    genres: &[&str],
    coords: Option<(f64, f64)>,
    draw: Option<u32>,
    preference: AvailabilityPreference,
) -> ArtistMatchData {
    ArtistMatchData {
        genres: slugs(genres),
        location: String::new(),
        latitude: coords.map(|c| c.0),
        longitude: coords.map(|c| c.1),
        draw_estimate: draw,
        availability_preference: preference,
    }
}

fn create_show_data(genres: &[&str], coords: (f64, f64), capacity: u32, date: NaiveDate) -> ShowMatchData {
    ShowMatchData {
        genres: slugs(genres),
        venue_city: String::new(),
        venue_latitude: Some(coords.0),
        venue_longitude: Some(coords.1),
        venue_capacity: capacity,
        show_date: date,
        compensation_type: Some("DOOR_SPLIT".to_string()),
    }
}

fn create_artist(
    genres: &[&str],
    coords: Option<(f64, f64)>,
    draw: Option<u32>,
    preference: AvailabilityPreference,
) -> ArtistRecord {
    ArtistRecord {
        id: Uuid::new_v4(),
        profile: create_artist_data(genres, coords, draw, preference),
    }
}

fn create_show(status: ShowStatus, genres: &[&str], coords: (f64, f64), capacity: u32) -> ShowRecord {
    ShowRecord {
        id: Uuid::new_v4(),
        status,
        date: saturday(),
        compensation_type: Some("GUARANTEE".to_string()),
        genres: slugs(genres),
        venue: VenueRecord {
            id: Uuid::new_v4(),
            city: "Greenville".to_string(),
            latitude: Some(coords.0),
            longitude: Some(coords.1),
            capacity,
        },
    }
}

fn generator(store: &Arc<InMemoryStore>, roster_ttl: Duration) -> MatchGenerator {
    MatchGenerator::new(store.clone(), Matcher::new(), roster_ttl, 4)
}

#[test]
fn test_end_to_end_strong_fit() {
    let artist = create_artist_data(&["punk", "hardcore"], Some(GREENVILLE), Some(60), AvailabilityPreference::AnyNight);
    let show = create_show_data(&["punk", "hardcore"], GREENVILLE, 80, saturday());

    let score = compute_match_score(&artist, &show);
    assert!(score > 80, "score {}", score);
}

#[test]
fn test_end_to_end_poor_fit() {
    let miles = haversine_distance(NYC.0, NYC.1, CHARLOTTE.0, CHARLOTTE.1);
    assert!(miles > 520.0 && miles < 540.0, "distance {}", miles);

    let artist = create_artist_data(&["jazz", "blues"], Some(NYC), Some(50), AvailabilityPreference::Weekends);
    let show = create_show_data(&["punk", "hardcore"], CHARLOTTE, 500, wednesday());

    let score = compute_match_score(&artist, &show);
    assert!(score < 20, "score {}", score);
}

#[test]
fn test_end_to_end_partial_fit() {
    let artist = create_artist_data(&["punk", "rock"], Some(GREENVILLE), Some(500), AvailabilityPreference::Weekends);
    let show = create_show_data(&["punk", "hardcore"], GREENVILLE, 100, saturday());

    let score = compute_match_score(&artist, &show);
    assert!(score > 30 && score < 70, "score {}", score);
}

#[tokio::test]
async fn test_sweep_show_creates_suggested_matches() {
    let store = Arc::new(InMemoryStore::new());
    let show = create_show(ShowStatus::Open, &["punk", "hardcore"], GREENVILLE, 80);

    let strong = create_artist(&["punk", "hardcore"], Some(GREENVILLE), Some(60), AvailabilityPreference::AnyNight);
    let nearby = create_artist(&["punk"], Some(ASHEVILLE), Some(70), AvailabilityPreference::Weekends);
    let far = create_artist(&["punk", "hardcore"], Some(COLUMBUS), Some(60), AvailabilityPreference::AnyNight);
    // No coordinates: passes the distance filter, scores 5
    let weak = create_artist(&["jazz"], None, None, AvailabilityPreference::Weeknights);

    store.insert_show(show.clone()).await;
    for artist in [&strong, &nearby, &far, &weak] {
        store.insert_artist(artist.clone()).await;
    }

    let report = generator(&store, Duration::ZERO)
        .generate_matches_for_show(show.id)
        .await
        .unwrap();

    assert!(!report.skipped);
    assert_eq!(report.artists_considered, 4);
    assert_eq!(report.skipped_distance, 1);
    assert_eq!(report.below_threshold, 1);
    assert_eq!(report.created, 2);
    assert_eq!(report.updated, 0);
    assert_eq!(report.failed, 0);

    let stored = store.get_match(strong.id, show.id).await.unwrap().unwrap();
    assert_eq!(stored.status, MatchStatus::Suggested);
    assert_eq!(stored.score, 95);

    assert!(store.get_match(far.id, show.id).await.unwrap().is_none());
    assert!(store.get_match(weak.id, show.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_sweep_is_idempotent_and_keeps_status() {
    let store = Arc::new(InMemoryStore::new());
    let show = create_show(ShowStatus::Open, &["punk", "hardcore"], GREENVILLE, 80);
    let artist = create_artist(&["punk", "hardcore"], Some(GREENVILLE), Some(60), AvailabilityPreference::AnyNight);
    let other = create_artist(&["punk"], Some(ASHEVILLE), Some(70), AvailabilityPreference::AnyNight);

    store.insert_show(show.clone()).await;
    store.insert_artist(artist.clone()).await;
    store.insert_artist(other.clone()).await;

    let generator = generator(&store, Duration::ZERO);
    generator.generate_matches_for_show(show.id).await.unwrap();
    let first = store.matches_for_show(show.id).await;

    let liked = MatchStatus::Suggested.after_like(gigmatch::models::MatchSide::Venue);
    assert!(store.update_match_status(artist.id, show.id, liked).await.unwrap());

    let report = generator.generate_matches_for_show(show.id).await.unwrap();
    assert_eq!(report.created, 0);
    assert_eq!(report.updated, 2);

    let second = store.matches_for_show(show.id).await;
    assert_eq!(first.len(), second.len());
    for (before, after) in first.iter().zip(&second) {
        assert_eq!(before.artist_id, after.artist_id);
        assert_eq!(before.score, after.score);
    }

    let record = store.get_match(artist.id, show.id).await.unwrap().unwrap();
    assert_eq!(record.status, MatchStatus::LikedByVenue);
}

#[tokio::test]
async fn test_record_kept_when_score_drops_below_threshold() {
    let store = Arc::new(InMemoryStore::new());
    let show = create_show(ShowStatus::Open, &["punk", "hardcore"], GREENVILLE, 80);
    let artist = create_artist(&["punk", "hardcore"], Some(GREENVILLE), Some(60), AvailabilityPreference::AnyNight);

    store.insert_show(show.clone()).await;
    store.insert_artist(artist.clone()).await;

    let generator = generator(&store, Duration::ZERO);
    let report = generator.generate_matches_for_show(show.id).await.unwrap();
    assert_eq!(report.created, 1);

    let liked = MatchStatus::Suggested.after_like(gigmatch::models::MatchSide::Artist);
    assert!(store.update_match_status(artist.id, show.id, liked).await.unwrap());
    let before = store.get_match(artist.id, show.id).await.unwrap().unwrap();

    // Same artist, reworked profile that no longer fits the show
    let reworked = ArtistRecord {
        id: artist.id,
        profile: create_artist_data(&["jazz"], None, None, AvailabilityPreference::Weeknights),
    };
    assert!(compute_match_score(&reworked.profile, &show.to_match_data()) < MIN_MATCH_SCORE);
    store.insert_artist(reworked).await;

    let report = generator.generate_matches_for_show(show.id).await.unwrap();
    assert_eq!(report.below_threshold, 1);
    assert_eq!(report.created, 0);
    assert_eq!(report.updated, 0);

    let after = store.get_match(artist.id, show.id).await.unwrap().unwrap();
    assert_eq!(after.score, before.score);
    assert_eq!(after.status, MatchStatus::LikedByArtist);
}

#[tokio::test]
async fn test_sweep_skips_non_open_show() {
    let store = Arc::new(InMemoryStore::new());
    let show = create_show(ShowStatus::Full, &["punk"], GREENVILLE, 80);
    store.insert_show(show.clone()).await;
    store
        .insert_artist(create_artist(&["punk"], Some(GREENVILLE), Some(60), AvailabilityPreference::AnyNight))
        .await;

    let report = generator(&store, Duration::ZERO)
        .generate_matches_for_show(show.id)
        .await
        .unwrap();

    assert!(report.skipped);
    assert_eq!(store.match_count().await, 0);
}

#[tokio::test]
async fn test_sweep_isolates_pair_failures() {
    let store = Arc::new(InMemoryStore::new());
    let show = create_show(ShowStatus::Open, &["punk", "hardcore"], GREENVILLE, 80);
    let broken = create_artist(&["punk", "hardcore"], Some(GREENVILLE), Some(60), AvailabilityPreference::AnyNight);
    let healthy = create_artist(&["punk"], Some(GREENVILLE), Some(60), AvailabilityPreference::AnyNight);

    store.insert_show(show.clone()).await;
    store.insert_artist(broken.clone()).await;
    store.insert_artist(healthy.clone()).await;
    store.fail_upserts_for_artist(broken.id).await;

    let report = generator(&store, Duration::ZERO)
        .generate_matches_for_show(show.id)
        .await
        .unwrap();

    assert_eq!(report.failed, 1);
    assert_eq!(report.created, 1);
    assert!(store.get_match(healthy.id, show.id).await.unwrap().is_some());
    assert!(store.get_match(broken.id, show.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_sweep_all_counts_failed_shows() {
    let store = Arc::new(InMemoryStore::new());
    let open_a = create_show(ShowStatus::Open, &["punk"], GREENVILLE, 80);
    let open_b = create_show(ShowStatus::Open, &["punk", "hardcore"], ASHEVILLE, 120);
    let broken = create_show(ShowStatus::Open, &["punk"], GREENVILLE, 80);
    let cancelled = create_show(ShowStatus::Cancelled, &["punk"], GREENVILLE, 80);

    for show in [&open_a, &open_b, &broken, &cancelled] {
        store.insert_show(show.clone()).await;
    }
    store.fail_show(broken.id).await;
    store
        .insert_artist(create_artist(&["punk"], Some(GREENVILLE), Some(60), AvailabilityPreference::AnyNight))
        .await;

    let summary = generator(&store, Duration::from_secs(30))
        .generate_all_matches()
        .await
        .unwrap();

    assert_eq!(summary.processed, 3);
    assert_eq!(summary.failed, 1);
    assert!(!summary.cancelled);
    assert_eq!(store.matches_for_show(open_a.id).await.len(), 1);
    assert_eq!(store.matches_for_show(open_b.id).await.len(), 1);
    assert!(store.matches_for_show(cancelled.id).await.is_empty());
}

#[tokio::test]
async fn test_sweep_all_stops_when_cancelled() {
    let store = Arc::new(InMemoryStore::new());
    store
        .insert_show(create_show(ShowStatus::Open, &["punk"], GREENVILLE, 80))
        .await;
    store
        .insert_artist(create_artist(&["punk"], Some(GREENVILLE), Some(60), AvailabilityPreference::AnyNight))
        .await;

    let cancel = CancellationToken::new();
    cancel.cancel();

    let summary = generator(&store, Duration::ZERO)
        .generate_all_matches_with_cancel(&cancel)
        .await
        .unwrap();

    assert_eq!(summary.processed, 0);
    assert!(summary.cancelled);
    assert_eq!(store.match_count().await, 0);
}

#[tokio::test]
async fn test_sweep_all_loads_roster_once() {
    let store = Arc::new(InMemoryStore::new());
    for _ in 0..5 {
        store
            .insert_show(create_show(ShowStatus::Open, &["punk"], GREENVILLE, 80))
            .await;
    }
    store
        .insert_artist(create_artist(&["punk"], Some(GREENVILLE), Some(60), AvailabilityPreference::AnyNight))
        .await;

    let summary = generator(&store, Duration::from_secs(30))
        .generate_all_matches()
        .await
        .unwrap();

    assert_eq!(summary.processed, 5);
    assert_eq!(store.artist_loads().await, 1);
}

#[tokio::test]
async fn test_sweep_all_without_roster_cache() {
    let store = Arc::new(InMemoryStore::new());
    for _ in 0..3 {
        store
            .insert_show(create_show(ShowStatus::Open, &["punk"], GREENVILLE, 80))
            .await;
    }

    generator(&store, Duration::ZERO)
        .generate_all_matches()
        .await
        .unwrap();

    assert_eq!(store.artist_loads().await, 3);
}
