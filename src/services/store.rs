use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{ArtistRecord, MatchRecord, MatchStatus, ShowRecord};

/// Errors that can occur when reading or writing match data
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// What an upsert did to the match record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// New record with status `SUGGESTED`
    Created,
    /// Existing record; only the score was written
    ScoreUpdated,
}

/// Persistence collaborator for the match generation sweep
///
/// Match records are keyed by (artist_id, show_id). Implementations must
/// never change `status` from `upsert_match_score`; status belongs to the
/// interaction layer and is written only through `update_match_status`.
#[async_trait]
pub trait MatchStore: Send + Sync {
    /// Load a show with its venue and genre slugs. `None` if it does not exist.
    async fn get_show(&self, show_id: Uuid) -> Result<Option<ShowRecord>, StoreError>;

    /// IDs of every show currently open for booking
    async fn list_open_show_ids(&self) -> Result<Vec<Uuid>, StoreError>;

    /// Every artist profile with its genre slugs
    async fn list_artists(&self) -> Result<Vec<ArtistRecord>, StoreError>;

    async fn get_match(&self, artist_id: Uuid, show_id: Uuid) -> Result<Option<MatchRecord>, StoreError>;

    /// Insert a `SUGGESTED` match with `score`, or set only the score of the
    /// existing one
    async fn upsert_match_score(
        &self,
        artist_id: Uuid,
        show_id: Uuid,
        score: u8,
    ) -> Result<UpsertOutcome, StoreError>;

    /// Set the status of an existing match. Returns false if there is none.
    async fn update_match_status(
        &self,
        artist_id: Uuid,
        show_id: Uuid,
        status: MatchStatus,
    ) -> Result<bool, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;
}
