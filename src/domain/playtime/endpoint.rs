//! Per-path endpoint configuration.

use secrecy::Secret;

use super::errors::PlaytimeError;
use crate::domain::foundation::GameId;

/// Most players a single playtime query may name.
pub const MAX_STEAM_IDS_PER_QUERY: usize = 120;

/// Which of the two inbound endpoints a path belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointKind {
    /// `POST /set-playtime/bm/{path}`: moderation platform pushes playtime.
    ModerationPush,
    /// `POST /get-playtime/{path}`: scripts read consolidated playtime.
    PlaytimeQuery,
}

impl EndpointKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointKind::ModerationPush => "moderation_push",
            EndpointKind::PlaytimeQuery => "playtime_query",
        }
    }
}

/// Registered endpoint: whether it is on, its HMAC secret, and an optional
/// pinned game.
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    pub path: String,
    pub enabled: bool,
    pub secret: Secret<String>,
    pub fixed_game_id: Option<GameId>,
}

impl EndpointConfig {
    /// Creates an enabled endpoint; the path is normalised.
    pub fn new(path: &str, secret: impl Into<String>) -> Self {
        Self {
            path: normalize_path(path),
            enabled: true,
            secret: Secret::new(secret.into()),
            fixed_game_id: None,
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_fixed_game_id(mut self, game_id: GameId) -> Self {
        self.fixed_game_id = Some(game_id);
        self
    }

    /// Returns the game a request may act on.
    ///
    /// A pinned endpoint only serves its own game.
    pub fn resolve_game_id(&self, requested: GameId) -> Result<GameId, PlaytimeError> {
        match self.fixed_game_id {
            Some(fixed) if fixed != requested => Err(PlaytimeError::validation(
                "gameId",
                format!("endpoint only serves game {}", fixed),
            )),
            _ => Ok(requested),
        }
    }
}

/// Canonical path form: trimmed, lower-cased, spaces replaced with `-`.
pub fn normalize_path(path: &str) -> String {
    path.trim().to_lowercase().replace(' ', "-")
}
