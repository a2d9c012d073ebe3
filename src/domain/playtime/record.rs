//! Persisted playtime records and the observations merged into them.

use serde::Serialize;
use std::fmt;

use crate::domain::foundation::{GameId, SteamId, Timestamp};

const SECONDS_PER_HOUR: u64 = 60 * 60;

/// A newly observed pair of playtime values.
///
/// `None` means "nothing observed from this source"; merging never lets a
/// `None` overwrite a stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PlaytimeObservation {
    pub steam_playtime_seconds: Option<u64>,
    pub bm_playtime_seconds: Option<u64>,
}

impl PlaytimeObservation {
    /// Observation from the Steam provider.
    pub fn steam(seconds: Option<u64>) -> Self {
        Self {
            steam_playtime_seconds: seconds,
            bm_playtime_seconds: None,
        }
    }

    /// Observation pushed by the moderation platform.
    pub fn moderation(seconds: u64) -> Self {
        Self {
            steam_playtime_seconds: None,
            bm_playtime_seconds: Some(seconds),
        }
    }

    /// True when neither source carries a value.
    pub fn is_empty(&self) -> bool {
        self.steam_playtime_seconds.is_none() && self.bm_playtime_seconds.is_none()
    }
}

/// Latest known playtime for one player in one game.
///
/// `(steam_id, game_id)` is unique across the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaytimeRecord {
    pub id: i64,
    pub steam_id: SteamId,
    pub game_id: GameId,
    pub steam_playtime_seconds: Option<u64>,
    pub bm_playtime_seconds: Option<u64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PlaytimeRecord {
    /// Creates a record from its first observation.
    pub fn create(
        id: i64,
        steam_id: SteamId,
        game_id: GameId,
        observation: &PlaytimeObservation,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            steam_id,
            game_id,
            steam_playtime_seconds: observation.steam_playtime_seconds,
            bm_playtime_seconds: observation.bm_playtime_seconds,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merges an observation: present fields replace, absent fields are kept.
    pub fn apply(&mut self, observation: &PlaytimeObservation, now: Timestamp) {
        if let Some(seconds) = observation.steam_playtime_seconds {
            self.steam_playtime_seconds = Some(seconds);
        }
        if let Some(seconds) = observation.bm_playtime_seconds {
            self.bm_playtime_seconds = Some(seconds);
        }
        self.updated_at = now;
    }

    /// Whole hours of Steam playtime.
    pub fn steam_playtime_hours(&self) -> Option<u64> {
        self.steam_playtime_seconds.map(|s| s / SECONDS_PER_HOUR)
    }

    /// Whole hours of moderation-platform playtime.
    pub fn bm_playtime_hours(&self) -> Option<u64> {
        self.bm_playtime_seconds.map(|s| s / SECONDS_PER_HOUR)
    }
}

impl fmt::Display for PlaytimeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = |h: Option<u64>| h.map_or_else(|| "-".to_string(), |h| h.to_string());
        write!(
            f,
            "{} - ST: {}, BM: {}",
            self.steam_id,
            hours(self.steam_playtime_hours()),
            hours(self.bm_playtime_hours())
        )
    }
}
