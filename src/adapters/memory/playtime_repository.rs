//! In-memory PlaytimeRepository.
//!
//! Used by tests and local runs without a database. A single mutex guards
//! the whole map, so each upsert is one atomic check-and-write and a batch
//! is applied all-or-nothing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::foundation::{DomainError, GameId, SteamId, Timestamp};
use crate::domain::playtime::{PlaytimeObservation, PlaytimeRecord};
use crate::ports::PlaytimeRepository;

#[derive(Debug, Default)]
struct Store {
    next_id: i64,
    records: HashMap<(SteamId, GameId), PlaytimeRecord>,
}

impl Store {
    fn upsert(
        &mut self,
        steam_id: &SteamId,
        game_id: GameId,
        observation: &PlaytimeObservation,
        now: Timestamp,
    ) -> PlaytimeRecord {
        let key = (steam_id.clone(), game_id);
        if let Some(existing) = self.records.get_mut(&key) {
            existing.apply(observation, now);
            return existing.clone();
        }

        self.next_id += 1;
        let record = PlaytimeRecord::create(self.next_id, steam_id.clone(), game_id, observation, now);
        self.records.insert(key, record.clone());
        record
    }
}

/// In-memory implementation of the PlaytimeRepository port.
#[derive(Debug, Default)]
pub struct InMemoryPlaytimeRepository {
    store: Mutex<Store>,
}

impl InMemoryPlaytimeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored record, if any.
    pub fn get(&self, steam_id: &SteamId, game_id: GameId) -> Option<PlaytimeRecord> {
        self.lock()
            .ok()?
            .records
            .get(&(steam_id.clone(), game_id))
            .cloned()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.lock().map(|store| store.records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Store>, DomainError> {
        self.store
            .lock()
            .map_err(|_| DomainError::database("playtime store lock poisoned"))
    }
}

#[async_trait]
impl PlaytimeRepository for InMemoryPlaytimeRepository {
    async fn upsert(
        &self,
        steam_id: &SteamId,
        game_id: GameId,
        observation: &PlaytimeObservation,
    ) -> Result<PlaytimeRecord, DomainError> {
        let mut store = self.lock()?;
        Ok(store.upsert(steam_id, game_id, observation, Timestamp::now()))
    }

    async fn upsert_batch(
        &self,
        game_id: GameId,
        observations: &[(SteamId, PlaytimeObservation)],
    ) -> Result<Vec<PlaytimeRecord>, DomainError> {
        let mut store = self.lock()?;
        let now = Timestamp::now();
        Ok(observations
            .iter()
            .map(|(steam_id, observation)| store.upsert(steam_id, game_id, observation, now))
            .collect())
    }

    async fn find_many(
        &self,
        steam_ids: &[SteamId],
        game_id: GameId,
    ) -> Result<Vec<PlaytimeRecord>, DomainError> {
        let store = self.lock()?;
        let mut found: Vec<PlaytimeRecord> = Vec::new();
        for steam_id in steam_ids {
            if found.iter().any(|r| &r.steam_id == steam_id) {
                continue;
            }
            if let Some(record) = store.records.get(&(steam_id.clone(), game_id)) {
                found.push(record.clone());
            }
        }
        Ok(found)
    }
}
