//! Gigmatch - artist/show matching engine for a live-music booking marketplace
//!
//! Scores how well an artist fits an open show (genre overlap, distance,
//! expected draw against venue capacity, night-of-week availability, and
//! compensation) and sweeps open shows to persist match candidates for both
//! sides of the marketplace.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{compute_match_score, haversine_distance, Matcher, MIN_MATCH_SCORE};
pub use crate::models::{ArtistMatchData, AvailabilityPreference, MatchScoreBreakdown, ScoringWeights, ShowMatchData};
pub use crate::services::{InMemoryStore, MatchGenerator, MatchStore, PostgresClient, ShowSweepReport, SweepSummary};
