//! Playtime repository port.
//!
//! Defines the contract for the playtime store. The key write primitive is an
//! atomic upsert: create the `(steam_id, game_id)` record if absent, otherwise
//! merge in only the fields the observation carries.
//!
//! # Design
//!
//! - **Single conditional write**: implementations must not read, branch on
//!   existence and then write; two concurrent first observations for the same
//!   key would race.
//! - **Batch atomicity**: `upsert_batch` commits all of its writes or none.
//! - **No deletes**: records are never removed by the service.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, GameId, SteamId};
use crate::domain::playtime::{PlaytimeObservation, PlaytimeRecord};

/// Repository port for playtime records.
#[async_trait]
pub trait PlaytimeRepository: Send + Sync {
    /// Atomically creates or merges one record and returns its new state.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn upsert(
        &self,
        steam_id: &SteamId,
        game_id: GameId,
        observation: &PlaytimeObservation,
    ) -> Result<PlaytimeRecord, DomainError>;

    /// Upserts every observation for `game_id` inside one transaction.
    ///
    /// Returned records follow the order of `observations`.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure; nothing is committed
    async fn upsert_batch(
        &self,
        game_id: GameId,
        observations: &[(SteamId, PlaytimeObservation)],
    ) -> Result<Vec<PlaytimeRecord>, DomainError>;

    /// Returns the existing records among `steam_ids` for `game_id`.
    ///
    /// Ids without a record are simply absent from the result.
    async fn find_many(
        &self,
        steam_ids: &[SteamId],
        game_id: GameId,
    ) -> Result<Vec<PlaytimeRecord>, DomainError>;
}
