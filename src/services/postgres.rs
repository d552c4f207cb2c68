use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;
use uuid::Uuid;

use crate::models::{
    ArtistMatchData, ArtistRecord, AvailabilityPreference, MatchRecord, MatchStatus, ShowRecord,
    ShowStatus, VenueRecord,
};
use crate::services::store::{MatchStore, StoreError, UpsertOutcome};

/// Show status as stored in PostgreSQL
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "show_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DbShowStatus {
    Open,
    Full,
    Cancelled,
}

impl From<DbShowStatus> for ShowStatus {
    fn from(value: DbShowStatus) -> Self {
        match value {
            DbShowStatus::Open => ShowStatus::Open,
            DbShowStatus::Full => ShowStatus::Full,
            DbShowStatus::Cancelled => ShowStatus::Cancelled,
        }
    }
}

/// Match status as stored in PostgreSQL
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "match_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DbMatchStatus {
    Suggested,
    LikedByArtist,
    LikedByVenue,
    Mutual,
    Passed,
}

impl From<MatchStatus> for DbMatchStatus {
    fn from(value: MatchStatus) -> Self {
        match value {
            MatchStatus::Suggested => DbMatchStatus::Suggested,
            MatchStatus::LikedByArtist => DbMatchStatus::LikedByArtist,
            MatchStatus::LikedByVenue => DbMatchStatus::LikedByVenue,
            MatchStatus::Mutual => DbMatchStatus::Mutual,
            MatchStatus::Passed => DbMatchStatus::Passed,
        }
    }
}

impl From<DbMatchStatus> for MatchStatus {
    fn from(value: DbMatchStatus) -> Self {
        match value {
            DbMatchStatus::Suggested => MatchStatus::Suggested,
            DbMatchStatus::LikedByArtist => MatchStatus::LikedByArtist,
            DbMatchStatus::LikedByVenue => MatchStatus::LikedByVenue,
            DbMatchStatus::Mutual => MatchStatus::Mutual,
            DbMatchStatus::Passed => MatchStatus::Passed,
        }
    }
}

/// PostgreSQL-backed match store
///
/// Reads shows, venues and artist profiles owned by the marketplace
/// application and writes match candidates to the `matches` table.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }
}

fn show_from_row(row: &PgRow) -> Result<ShowRecord, StoreError> {
    let status: DbShowStatus = row.try_get("status")?;
    let capacity: i32 = row.try_get("capacity")?;
    let capacity = u32::try_from(capacity)
        .map_err(|_| StoreError::InvalidData(format!("negative venue capacity {}", capacity)))?;

    Ok(ShowRecord {
        id: row.try_get("id")?,
        status: status.into(),
        date: row.try_get("date")?,
        compensation_type: row.try_get("compensation_type")?,
        genres: row.try_get("genres")?,
        venue: VenueRecord {
            id: row.try_get("venue_id")?,
            city: row.try_get("city")?,
            latitude: row.try_get("latitude")?,
            longitude: row.try_get("longitude")?,
            capacity,
        },
    })
}

fn artist_from_row(row: &PgRow) -> Result<ArtistRecord, StoreError> {
    let draw: Option<i32> = row.try_get("draw_estimate")?;
    // Negative draw estimates carry no signal
    let draw_estimate = draw.and_then(|d| u32::try_from(d).ok());
    let preference: String = row.try_get("availability_preference")?;
    let availability_preference = preference
        .parse::<AvailabilityPreference>()
        .unwrap_or(AvailabilityPreference::Other);

    Ok(ArtistRecord {
        id: row.try_get("id")?,
        profile: ArtistMatchData {
            genres: row.try_get("genres")?,
            location: row.try_get("location")?,
            latitude: row.try_get("latitude")?,
            longitude: row.try_get("longitude")?,
            draw_estimate,
            availability_preference,
        },
    })
}

#[async_trait]
impl MatchStore for PostgresClient {
    async fn get_show(&self, show_id: Uuid) -> Result<Option<ShowRecord>, StoreError> {
        let query = r#"
            SELECT
                s.id, s.date, s.status, s.compensation_type,
                v.id AS venue_id, v.city, v.latitude, v.longitude, v.capacity,
                COALESCE(
                    ARRAY_AGG(g.slug ORDER BY g.slug) FILTER (WHERE g.slug IS NOT NULL),
                    '{}'
                ) AS genres
            FROM shows s
            JOIN venue_profiles v ON v.id = s.venue_id
            LEFT JOIN show_genres sg ON sg.show_id = s.id
            LEFT JOIN genres g ON g.id = sg.genre_id
            WHERE s.id = $1
            GROUP BY s.id, v.id
        "#;

        let row = sqlx::query(query)
            .bind(show_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(show_from_row).transpose()
    }

    async fn list_open_show_ids(&self) -> Result<Vec<Uuid>, StoreError> {
        let query = r#"
            SELECT id
            FROM shows
            WHERE status = 'OPEN'
            ORDER BY date, id
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| row.try_get("id").map_err(StoreError::from))
            .collect()
    }

    async fn list_artists(&self) -> Result<Vec<ArtistRecord>, StoreError> {
        let query = r#"
            SELECT
                a.id, a.location, a.latitude, a.longitude, a.draw_estimate,
                a.availability_preference,
                COALESCE(
                    ARRAY_AGG(g.slug ORDER BY g.slug) FILTER (WHERE g.slug IS NOT NULL),
                    '{}'
                ) AS genres
            FROM artist_profiles a
            LEFT JOIN artist_genres ag ON ag.artist_id = a.id
            LEFT JOIN genres g ON g.id = ag.genre_id
            GROUP BY a.id
            ORDER BY a.id
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;
        let artists = rows.iter().map(artist_from_row).collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Loaded {} artist profiles", artists.len());

        Ok(artists)
    }

    async fn get_match(&self, artist_id: Uuid, show_id: Uuid) -> Result<Option<MatchRecord>, StoreError> {
        let query = r#"
            SELECT artist_id, show_id, score, status
            FROM matches
            WHERE artist_id = $1 AND show_id = $2
        "#;

        let row = sqlx::query(query)
            .bind(artist_id)
            .bind(show_id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let score: i16 = row.try_get("score")?;
        let status: DbMatchStatus = row.try_get("status")?;

        Ok(Some(MatchRecord {
            artist_id: row.try_get("artist_id")?,
            show_id: row.try_get("show_id")?,
            score: u8::try_from(score)
                .map_err(|_| StoreError::InvalidData(format!("match score {} out of range", score)))?,
            status: status.into(),
        }))
    }

    /// Uses INSERT ... ON CONFLICT so concurrent sweeps stay idempotent.
    /// The conflict branch writes the score only; status is left alone.
    async fn upsert_match_score(
        &self,
        artist_id: Uuid,
        show_id: Uuid,
        score: u8,
    ) -> Result<UpsertOutcome, StoreError> {
        let query = r#"
            INSERT INTO matches (artist_id, show_id, score, status)
            VALUES ($1, $2, $3, 'SUGGESTED')
            ON CONFLICT (artist_id, show_id)
            DO UPDATE SET
                score = EXCLUDED.score,
                updated_at = NOW()
            RETURNING (xmax = 0) AS inserted
        "#;

        let row = sqlx::query(query)
            .bind(artist_id)
            .bind(show_id)
            .bind(i16::from(score))
            .fetch_one(&self.pool)
            .await?;

        let inserted: bool = row.try_get("inserted")?;

        Ok(if inserted {
            UpsertOutcome::Created
        } else {
            UpsertOutcome::ScoreUpdated
        })
    }

    async fn update_match_status(
        &self,
        artist_id: Uuid,
        show_id: Uuid,
        status: MatchStatus,
    ) -> Result<bool, StoreError> {
        let query = r#"
            UPDATE matches
            SET status = $3, updated_at = NOW()
            WHERE artist_id = $1 AND show_id = $2
        "#;

        let result = sqlx::query(query)
            .bind(artist_id)
            .bind(show_id)
            .bind(DbMatchStatus::from(status))
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Health check for the database connection
    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
