use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// When an artist is willing to play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvailabilityPreference {
    AnyNight,
    Weekends,
    Weeknights,
    SpecificDates,
    /// Any value this service does not recognise; scored like `SpecificDates`
    #[serde(other)]
    Other,
}

impl AvailabilityPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            AvailabilityPreference::AnyNight => "ANY_NIGHT",
            AvailabilityPreference::Weekends => "WEEKENDS",
            AvailabilityPreference::Weeknights => "WEEKNIGHTS",
            AvailabilityPreference::SpecificDates => "SPECIFIC_DATES",
            AvailabilityPreference::Other => "OTHER",
        }
    }
}

impl FromStr for AvailabilityPreference {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value {
            "ANY_NIGHT" => AvailabilityPreference::AnyNight,
            "WEEKENDS" => AvailabilityPreference::Weekends,
            "WEEKNIGHTS" => AvailabilityPreference::Weeknights,
            "SPECIFIC_DATES" => AvailabilityPreference::SpecificDates,
            _ => AvailabilityPreference::Other,
        })
    }
}

impl fmt::Display for AvailabilityPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Artist-side input to the scoring engine
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ArtistMatchData {
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub location: String,
    #[validate(range(min = -90.0, max = 90.0))]
    #[serde(default)]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(rename = "drawEstimate", default)]
    pub draw_estimate: Option<u32>,
    #[serde(rename = "availabilityPreference")]
    pub availability_preference: AvailabilityPreference,
}

/// Show-side input to the scoring engine
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ShowMatchData {
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(rename = "venueCity", default)]
    pub venue_city: String,
    #[validate(range(min = -90.0, max = 90.0))]
    #[serde(rename = "venueLatitude", default)]
    pub venue_latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    #[serde(rename = "venueLongitude", default)]
    pub venue_longitude: Option<f64>,
    #[validate(range(min = 1))]
    #[serde(rename = "venueCapacity")]
    pub venue_capacity: u32,
    /// Calendar date of the show; timestamps are converted to their UTC date
    #[serde(rename = "showDate", deserialize_with = "deserialize_show_date")]
    pub show_date: NaiveDate,
    #[serde(rename = "compensationType", default)]
    pub compensation_type: Option<String>,
}

/// Accepts either `YYYY-MM-DD` or an RFC 3339 timestamp
fn deserialize_show_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(date) = NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(&raw)
        .map(|ts| ts.with_timezone(&Utc).date_naive())
        .map_err(|e| serde::de::Error::custom(format!("invalid show date {:?}: {}", raw, e)))
}

/// Per-component scores, each in [0.0, 1.0]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchScoreBreakdown {
    pub genre: f64,
    pub location: f64,
    #[serde(rename = "capacityDraw")]
    pub capacity_draw: f64,
    pub availability: f64,
    pub compensation: f64,
}

/// Scoring weights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub genre: f64,
    pub location: f64,
    pub capacity_draw: f64,
    pub availability: f64,
    pub compensation: f64,
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.genre + self.location + self.capacity_draw + self.availability + self.compensation
    }

    /// Weighted sum of a breakdown, in [0.0, 1.0] for normalised weights
    pub fn apply(&self, breakdown: &MatchScoreBreakdown) -> f64 {
        breakdown.genre * self.genre
            + breakdown.location * self.location
            + breakdown.capacity_draw * self.capacity_draw
            + breakdown.availability * self.availability
            + breakdown.compensation * self.compensation
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            genre: 0.30,
            location: 0.25,
            capacity_draw: 0.20,
            availability: 0.15,
            compensation: 0.10,
        }
    }
}

/// Show lifecycle state; only open shows are matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShowStatus {
    Open,
    Full,
    Cancelled,
}

/// Match lifecycle state, owned by the interaction layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    Suggested,
    LikedByArtist,
    LikedByVenue,
    Mutual,
    Passed,
}

/// Which party acted on a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchSide {
    Artist,
    Venue,
}

impl MatchStatus {
    /// Status after `side` likes the match. A like from the other side
    /// completes a mutual match; everything else is left as is.
    pub fn after_like(self, side: MatchSide) -> Self {
        match (self, side) {
            (MatchStatus::Suggested, MatchSide::Artist) => MatchStatus::LikedByArtist,
            (MatchStatus::Suggested, MatchSide::Venue) => MatchStatus::LikedByVenue,
            (MatchStatus::LikedByVenue, MatchSide::Artist) => MatchStatus::Mutual,
            (MatchStatus::LikedByArtist, MatchSide::Venue) => MatchStatus::Mutual,
            (status, _) => status,
        }
    }

    /// Status after either side passes
    pub fn after_pass(self) -> Self {
        MatchStatus::Passed
    }

    /// Status after a reconsider or an admin reset
    pub fn after_reset(self) -> Self {
        MatchStatus::Suggested
    }

    pub fn is_mutual(&self) -> bool {
        matches!(self, MatchStatus::Mutual)
    }
}

/// Persisted match candidate, unique per (artist, show)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    #[serde(rename = "artistId")]
    pub artist_id: Uuid,
    #[serde(rename = "showId")]
    pub show_id: Uuid,
    pub score: u8,
    pub status: MatchStatus,
}

/// Venue fields the scoring engine needs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueRecord {
    pub id: Uuid,
    pub city: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub capacity: u32,
}

/// Show as loaded from the store, with its venue and genre slugs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowRecord {
    pub id: Uuid,
    pub status: ShowStatus,
    pub date: NaiveDate,
    #[serde(rename = "compensationType")]
    pub compensation_type: Option<String>,
    pub genres: Vec<String>,
    pub venue: VenueRecord,
}

impl ShowRecord {
    pub fn is_open(&self) -> bool {
        self.status == ShowStatus::Open
    }

    pub fn to_match_data(&self) -> ShowMatchData {
        ShowMatchData {
            genres: self.genres.clone(),
            venue_city: self.venue.city.clone(),
            venue_latitude: self.venue.latitude,
            venue_longitude: self.venue.longitude,
            venue_capacity: self.venue.capacity,
            show_date: self.date,
            compensation_type: self.compensation_type.clone(),
        }
    }
}

/// Artist profile as loaded from the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistRecord {
    pub id: Uuid,
    #[serde(flatten)]
    pub profile: ArtistMatchData,
}

/// An artist that passed the distance pre-filter and the score threshold
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredCandidate {
    #[serde(rename = "artistId")]
    pub artist_id: Uuid,
    pub score: u8,
    pub breakdown: MatchScoreBreakdown,
}

/// Geospatial bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_transitions() {
        use MatchSide::*;
        use MatchStatus::*;

        assert_eq!(Suggested.after_like(Artist), LikedByArtist);
        assert_eq!(Suggested.after_like(Venue), LikedByVenue);
        assert_eq!(LikedByVenue.after_like(Artist), Mutual);
        assert_eq!(LikedByArtist.after_like(Venue), Mutual);

        // Repeated likes and likes on settled matches are no-ops
        assert_eq!(LikedByArtist.after_like(Artist), LikedByArtist);
        assert_eq!(Mutual.after_like(Venue), Mutual);
        assert_eq!(Passed.after_like(Artist), Passed);
    }

    #[test]
    fn test_pass_and_reset() {
        assert_eq!(MatchStatus::Mutual.after_pass(), MatchStatus::Passed);
        assert_eq!(MatchStatus::Passed.after_reset(), MatchStatus::Suggested);
        assert!(MatchStatus::Mutual.is_mutual());
    }

    #[test]
    fn test_unknown_availability_deserializes_to_other() {
        let pref: AvailabilityPreference = serde_json::from_str("\"FULL_MOONS\"").unwrap();
        assert_eq!(pref, AvailabilityPreference::Other);

        let pref: AvailabilityPreference = "WEEKENDS".parse().unwrap();
        assert_eq!(pref, AvailabilityPreference::Weekends);
    }

    #[test]
    fn test_show_date_accepts_timestamps_in_utc() {
        let json = r#"{
            "genres": ["punk"],
            "venueCity": "Columbus, OH",
            "venueCapacity": 80,
            "showDate": "2026-03-14T23:30:00-05:00"
        }"#;
        let show: ShowMatchData = serde_json::from_str(json).unwrap();
        // 23:30 in UTC-5 is already the next day in UTC
        assert_eq!(show.show_date, NaiveDate::from_ymd_opt(2026, 3, 15).unwrap());

        let json = r#"{"venueCapacity": 80, "showDate": "2026-03-14"}"#;
        let show: ShowMatchData = serde_json::from_str(json).unwrap();
        assert_eq!(show.show_date, NaiveDate::from_ymd_opt(2026, 3, 14).unwrap());
        assert!(show.venue_latitude.is_none());
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        let weights = ScoringWeights::default();
        assert!((weights.sum() - 1.0).abs() < 1e-9);
    }
}
