// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    ArtistMatchData, ArtistRecord, AvailabilityPreference, BoundingBox, MatchRecord,
    MatchScoreBreakdown, MatchSide, MatchStatus, ScoredCandidate, ScoringWeights, ShowMatchData,
    ShowRecord, ShowStatus, VenueRecord,
};
pub use requests::ScoreMatchRequest;
pub use responses::{ErrorResponse, HealthResponse, ScoreMatchResponse, SweepResponse};
