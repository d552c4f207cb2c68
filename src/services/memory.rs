use async_trait::async_trait;
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap, HashSet};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{ArtistRecord, MatchRecord, MatchStatus, ShowRecord};
use crate::services::store::{MatchStore, StoreError, UpsertOutcome};

/// In-process match store
///
/// Keeps the same contract as the PostgreSQL store. Used for tests and for
/// running the service without a database. Failures can be injected per
/// show or per artist to exercise the sweep's error isolation.
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    shows: BTreeMap<Uuid, ShowRecord>,
    artists: BTreeMap<Uuid, ArtistRecord>,
    matches: HashMap<(Uuid, Uuid), MatchRecord>,
    failing_shows: HashSet<Uuid>,
    failing_artists: HashSet<Uuid>,
    artist_loads: usize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_show(&self, show: ShowRecord) {
        self.inner.write().await.shows.insert(show.id, show);
    }

    pub async fn insert_artist(&self, artist: ArtistRecord) {
        self.inner.write().await.artists.insert(artist.id, artist);
    }

    /// Make `get_show` fail for this show
    pub async fn fail_show(&self, show_id: Uuid) {
        self.inner.write().await.failing_shows.insert(show_id);
    }

    /// Make `upsert_match_score` fail for every pair involving this artist
    pub async fn fail_upserts_for_artist(&self, artist_id: Uuid) {
        self.inner.write().await.failing_artists.insert(artist_id);
    }

    /// All stored matches for a show, ordered by artist id
    pub async fn matches_for_show(&self, show_id: Uuid) -> Vec<MatchRecord> {
        let inner = self.inner.read().await;
        let mut matches: Vec<MatchRecord> = inner
            .matches
            .values()
            .filter(|m| m.show_id == show_id)
            .cloned()
            .collect();
        matches.sort_by_key(|m| m.artist_id);
        matches
    }

    pub async fn match_count(&self) -> usize {
        self.inner.read().await.matches.len()
    }

    /// How many times the artist roster has been loaded
    pub async fn artist_loads(&self) -> usize {
        self.inner.read().await.artist_loads
    }
}

#[async_trait]
impl MatchStore for InMemoryStore {
    async fn get_show(&self, show_id: Uuid) -> Result<Option<ShowRecord>, StoreError> {
        let inner = self.inner.read().await;
        if inner.failing_shows.contains(&show_id) {
            return Err(StoreError::Unavailable(format!("show {} could not be loaded", show_id)));
        }
        Ok(inner.shows.get(&show_id).cloned())
    }

    async fn list_open_show_ids(&self) -> Result<Vec<Uuid>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .shows
            .values()
            .filter(|show| show.is_open())
            .map(|show| show.id)
            .collect())
    }

    async fn list_artists(&self) -> Result<Vec<ArtistRecord>, StoreError> {
        let mut inner = self.inner.write().await;
        inner.artist_loads += 1;
        Ok(inner.artists.values().cloned().collect())
    }

    async fn get_match(&self, artist_id: Uuid, show_id: Uuid) -> Result<Option<MatchRecord>, StoreError> {
        Ok(self.inner.read().await.matches.get(&(artist_id, show_id)).cloned())
    }

    async fn upsert_match_score(
        &self,
        artist_id: Uuid,
        show_id: Uuid,
        score: u8,
    ) -> Result<UpsertOutcome, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.failing_artists.contains(&artist_id) {
            return Err(StoreError::Unavailable(format!(
                "match {}/{} could not be written",
                artist_id, show_id
            )));
        }

        match inner.matches.entry((artist_id, show_id)) {
            Entry::Occupied(mut existing) => {
                existing.get_mut().score = score;
                Ok(UpsertOutcome::ScoreUpdated)
            }
            Entry::Vacant(slot) => {
                slot.insert(MatchRecord {
                    artist_id,
                    show_id,
                    score,
                    status: MatchStatus::Suggested,
                });
                Ok(UpsertOutcome::Created)
            }
        }
    }

    async fn update_match_status(
        &self,
        artist_id: Uuid,
        show_id: Uuid,
        status: MatchStatus,
    ) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        match inner.matches.get_mut(&(artist_id, show_id)) {
            Some(existing) => {
                existing.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}
