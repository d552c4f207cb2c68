use serde::{Deserialize, Serialize};
use crate::models::domain::MatchScoreBreakdown;

/// Response for the score preview endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreMatchResponse {
    pub score: u8,
    pub breakdown: MatchScoreBreakdown,
    #[serde(rename = "withinDistance")]
    pub within_distance: bool,
}

/// Response for the sweep trigger endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepResponse {
    pub processed: usize,
    pub failed: usize,
    pub cancelled: bool,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
