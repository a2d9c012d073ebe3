//! RecordModerationPlaytimeHandler - Stores playtime pushed by the moderation platform.

use std::sync::Arc;

use crate::domain::foundation::{GameId, SteamId};
use crate::domain::playtime::{PlaytimeError, PlaytimeObservation, PlaytimeRecord};
use crate::ports::PlaytimeRepository;

/// Command carrying one pushed observation.
#[derive(Debug, Clone)]
pub struct RecordModerationPlaytimeCommand {
    pub steam_id: SteamId,
    pub game_id: GameId,
    pub playtime_seconds: u64,
}

/// Handler for moderation-platform pushes.
pub struct RecordModerationPlaytimeHandler {
    repository: Arc<dyn PlaytimeRepository>,
}

impl RecordModerationPlaytimeHandler {
    pub fn new(repository: Arc<dyn PlaytimeRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: RecordModerationPlaytimeCommand,
    ) -> Result<PlaytimeRecord, PlaytimeError> {
        let observation = PlaytimeObservation::moderation(cmd.playtime_seconds);

        let record = self
            .repository
            .upsert(&cmd.steam_id, cmd.game_id, &observation)
            .await
            .map_err(|e| {
                tracing::error!(
                    steam_id = %cmd.steam_id,
                    game_id = %cmd.game_id,
                    error = %e,
                    "Failed to store moderation playtime"
                );
                PlaytimeError::from(e)
            })?;

        tracing::debug!(record = %record, "Recorded moderation playtime");
        Ok(record)
    }
}
