//! HTTP DTOs (Data Transfer Objects) for playtime endpoints.
//!
//! These types define the JSON request/response structure for the playtime API.
//! They serve as the boundary between HTTP and the application layer.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{GameId, SteamId, Timestamp, ValidationError};
use crate::domain::playtime::PlaytimeRecord;

pub use crate::domain::playtime::MAX_STEAM_IDS_PER_QUERY;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /set-playtime/bm/{path}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPlaytimeRequest {
    pub steam_id: String,
    /// Seconds.
    pub playtime: i64,
    pub game_id: i64,
}

/// Validated form of [`SetPlaytimeRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSetPlaytime {
    pub steam_id: SteamId,
    pub playtime_seconds: u64,
    pub game_id: GameId,
}

impl SetPlaytimeRequest {
    pub fn validate(&self) -> Result<ValidSetPlaytime, ValidationError> {
        let steam_id = SteamId::parse("steamId", &self.steam_id)?;
        let playtime_seconds = u64::try_from(self.playtime)
            .map_err(|_| ValidationError::out_of_range("playtime", 0, i64::MAX, self.playtime))?;
        if self.game_id < 0 {
            return Err(ValidationError::out_of_range("gameId", 0, i64::MAX, self.game_id));
        }

        Ok(ValidSetPlaytime {
            steam_id,
            playtime_seconds,
            game_id: GameId::new(self.game_id),
        })
    }
}

/// Body of `POST /get-playtime/{path}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPlaytimeRequest {
    pub steam_ids: Vec<String>,
    pub game_id: i64,
    /// `true` forces a provider refresh for every id.
    #[serde(default)]
    pub is_need_update: bool,
}

/// Validated form of [`GetPlaytimeRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidGetPlaytime {
    pub steam_ids: Vec<SteamId>,
    pub game_id: GameId,
    pub is_need_update: bool,
}

impl GetPlaytimeRequest {
    pub fn validate(&self) -> Result<ValidGetPlaytime, ValidationError> {
        let count = self.steam_ids.len();
        if count == 0 {
            return Err(ValidationError::empty_field("steamIds"));
        }
        if count > MAX_STEAM_IDS_PER_QUERY {
            return Err(ValidationError::out_of_range(
                "steamIds",
                1,
                MAX_STEAM_IDS_PER_QUERY as i64,
                count as i64,
            ));
        }

        let steam_ids = self
            .steam_ids
            .iter()
            .map(|raw| SteamId::parse("steamIds", raw))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ValidGetPlaytime {
            steam_ids,
            game_id: GameId::new(self.game_id),
            is_need_update: self.is_need_update,
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// One entry of the `get-playtime` response array.
#[derive(Debug, Clone, Serialize)]
pub struct PlaytimeResponse {
    #[serde(rename = "steamId")]
    pub steam_id: String,
    pub steam_playtime_seconds: Option<u64>,
    pub bm_playtime_seconds: Option<u64>,
    #[serde(rename = "createdAt")]
    pub created_at: Timestamp,
    #[serde(rename = "updatedAt")]
    pub updated_at: Timestamp,
}

impl From<PlaytimeRecord> for PlaytimeResponse {
    fn from(record: PlaytimeRecord) -> Self {
        Self {
            steam_id: record.steam_id.as_str().to_string(),
            steam_playtime_seconds: record.steam_playtime_seconds,
            bm_playtime_seconds: record.bm_playtime_seconds,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}
