//! Playtime Provider Port - Interface for the external game-time provider.
//!
//! Abstracts the two ranked lookups the fetcher performs for a player:
//! recently played games first, then the owned catalog. Implementations
//! report playtime in **seconds**.
//!
//! # Example
//!
//! ```ignore
//! let recent = provider.recent_activity(&steam_id).await?;
//! if let Some(entry) = recent.iter().find(|g| g.game_id == game_id) {
//!     println!("{} seconds", entry.playtime_seconds);
//! }
//! ```

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{GameId, SteamId};

/// Port for reading per-game playtime from the external provider.
#[async_trait]
pub trait PlaytimeProvider: Send + Sync {
    /// Games the player has played recently.
    async fn recent_activity(&self, steam_id: &SteamId) -> Result<Vec<GamePlaytime>, ProviderError>;

    /// Every game the player owns.
    async fn owned_catalog(&self, steam_id: &SteamId) -> Result<Vec<GamePlaytime>, ProviderError>;
}

/// Total playtime for one game as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GamePlaytime {
    pub game_id: GameId,
    pub playtime_seconds: u64,
}

impl GamePlaytime {
    pub fn new(game_id: GameId, playtime_seconds: u64) -> Self {
        Self {
            game_id,
            playtime_seconds,
        }
    }
}

/// Transport-level failures of a provider lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The lookup did not finish in time.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Connection or protocol failure.
    #[error("network error: {0}")]
    Network(String),

    /// The provider answered with a non-success status.
    #[error("unexpected status code {0}")]
    UnexpectedStatus(u16),

    /// The response body could not be decoded.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

impl ProviderError {
    pub fn network(message: impl Into<String>) -> Self {
        ProviderError::Network(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        ProviderError::MalformedPayload(message.into())
    }
}
