use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{ArtistMatchData, ShowMatchData};

/// Request to score a single artist/show pair without persisting anything
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScoreMatchRequest {
    #[validate(nested)]
    pub artist: ArtistMatchData,
    #[validate(nested)]
    pub show: ShowMatchData,
}
