//! ReconcilePlaytimeHandler - Merges provider playtime into the store.
//!
//! Three access policies:
//!
//! - **ForceRefresh**: fetch every requested player, upsert all results in one batch
//! - **FetchUnknownOnly**: fetch only players with no stored record for the game
//! - **refresh_one**: single-player force refresh
//!
//! Results follow the caller's id order with repeats removed.

use std::collections::HashMap;
use std::sync::Arc;

use super::fetch_playtime::{dedupe_preserving_order, PlaytimeFetcher};
use crate::domain::foundation::{GameId, SteamId};
use crate::domain::playtime::{PlaytimeError, PlaytimeObservation, PlaytimeRecord};
use crate::ports::PlaytimeRepository;

/// Which players go to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcilePolicy {
    ForceRefresh,
    FetchUnknownOnly,
}

impl ReconcilePolicy {
    /// `isNeedUpdate` selects a forced refresh.
    pub fn from_need_update(need_update: bool) -> Self {
        if need_update {
            ReconcilePolicy::ForceRefresh
        } else {
            ReconcilePolicy::FetchUnknownOnly
        }
    }
}

/// Command to reconcile playtime for a set of players in one game.
#[derive(Debug, Clone)]
pub struct ReconcilePlaytimeCommand {
    pub steam_ids: Vec<SteamId>,
    pub game_id: GameId,
    pub policy: ReconcilePolicy,
}

/// Handler for playtime reconciliation.
pub struct ReconcilePlaytimeHandler {
    fetcher: Arc<PlaytimeFetcher>,
    repository: Arc<dyn PlaytimeRepository>,
}

impl ReconcilePlaytimeHandler {
    pub fn new(fetcher: Arc<PlaytimeFetcher>, repository: Arc<dyn PlaytimeRepository>) -> Self {
        Self {
            fetcher,
            repository,
        }
    }

    pub async fn handle(
        &self,
        cmd: ReconcilePlaytimeCommand,
    ) -> Result<Vec<PlaytimeRecord>, PlaytimeError> {
        let steam_ids = dedupe_preserving_order(&cmd.steam_ids);
        if steam_ids.is_empty() {
            return Ok(Vec::new());
        }

        match cmd.policy {
            ReconcilePolicy::ForceRefresh => self.force_refresh(&steam_ids, cmd.game_id).await,
            ReconcilePolicy::FetchUnknownOnly => {
                self.fetch_unknown_only(&steam_ids, cmd.game_id).await
            }
        }
    }

    /// Force-refreshes a single player.
    pub async fn refresh_one(
        &self,
        steam_id: &SteamId,
        game_id: GameId,
    ) -> Result<PlaytimeRecord, PlaytimeError> {
        let seconds = self.fetcher.fetch_one(steam_id, game_id).await;
        let record = self
            .repository
            .upsert(steam_id, game_id, &PlaytimeObservation::steam(seconds))
            .await?;

        tracing::debug!(record = %record, "Refreshed playtime");
        Ok(record)
    }

    async fn force_refresh(
        &self,
        steam_ids: &[SteamId],
        game_id: GameId,
    ) -> Result<Vec<PlaytimeRecord>, PlaytimeError> {
        let records = self.fetch_and_store(steam_ids, game_id).await?;
        Ok(in_request_order(steam_ids, records))
    }

    async fn fetch_unknown_only(
        &self,
        steam_ids: &[SteamId],
        game_id: GameId,
    ) -> Result<Vec<PlaytimeRecord>, PlaytimeError> {
        let mut records = self.repository.find_many(steam_ids, game_id).await?;

        let unknown: Vec<SteamId> = steam_ids
            .iter()
            .filter(|id| !records.iter().any(|record| &record.steam_id == *id))
            .cloned()
            .collect();

        tracing::debug!(
            game_id = %game_id,
            requested = steam_ids.len(),
            unknown = unknown.len(),
            "Reconciling unknown players only"
        );

        if !unknown.is_empty() {
            records.extend(self.fetch_and_store(&unknown, game_id).await?);
        }

        Ok(in_request_order(steam_ids, records))
    }

    /// Fetches `steam_ids` and writes every result in one batch.
    async fn fetch_and_store(
        &self,
        steam_ids: &[SteamId],
        game_id: GameId,
    ) -> Result<Vec<PlaytimeRecord>, PlaytimeError> {
        let mut fetched = self.fetcher.fetch_many(steam_ids, game_id).await;

        let observations: Vec<(SteamId, PlaytimeObservation)> = steam_ids
            .iter()
            .map(|id| {
                let seconds = fetched.remove(id).flatten();
                (id.clone(), PlaytimeObservation::steam(seconds))
            })
            .collect();

        self.repository
            .upsert_batch(game_id, &observations)
            .await
            .map_err(|e| {
                tracing::error!(game_id = %game_id, error = %e, "Failed to store playtime batch");
                PlaytimeError::from(e)
            })
    }
}

/// Re-projects records onto the requested id order.
fn in_request_order(steam_ids: &[SteamId], records: Vec<PlaytimeRecord>) -> Vec<PlaytimeRecord> {
    let mut by_id: HashMap<SteamId, PlaytimeRecord> = records
        .into_iter()
        .map(|record| (record.steam_id.clone(), record))
        .collect();

    steam_ids.iter().filter_map(|id| by_id.remove(id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryPlaytimeRepository;
    use crate::adapters::steam::MockPlaytimeProvider;
    use crate::domain::foundation::DomainError;
    use async_trait::async_trait;

    const GAME: i64 = 252490;
    const A: &str = "76561198000000001";
    const B: &str = "76561198000000002";
    const C: &str = "76561198000000003";

    struct Fixture {
        provider: MockPlaytimeProvider,
        repository: Arc<InMemoryPlaytimeRepository>,
        handler: ReconcilePlaytimeHandler,
    }

    fn fixture(provider: MockPlaytimeProvider) -> Fixture {
        let repository = Arc::new(InMemoryPlaytimeRepository::new());
        let fetcher = Arc::new(PlaytimeFetcher::new(Arc::new(provider.clone())));
        let handler = ReconcilePlaytimeHandler::new(fetcher, repository.clone());
        Fixture {
            provider,
            repository,
            handler,
        }
    }

    fn command(raw: &[&str], policy: ReconcilePolicy) -> ReconcilePlaytimeCommand {
        ReconcilePlaytimeCommand {
            steam_ids: raw.iter().map(|s| SteamId::new(*s)).collect(),
            game_id: GameId::new(GAME),
            policy,
        }
    }

    fn steam_ids(records: &[PlaytimeRecord]) -> Vec<&str> {
        records.iter().map(|r| r.steam_id.as_str()).collect()
    }

    #[test]
    fn policy_from_need_update() {
        assert_eq!(ReconcilePolicy::from_need_update(true), ReconcilePolicy::ForceRefresh);
        assert_eq!(
            ReconcilePolicy::from_need_update(false),
            ReconcilePolicy::FetchUnknownOnly
        );
    }

    // ════════════════════════════════════════════════════════════════════════════
    // ForceRefresh
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn force_refresh_fetches_and_stores_everyone() {
        let f = fixture(
            MockPlaytimeProvider::new()
                .with_recent(A, GAME, 60)
                .with_owned(B, GAME, 120),
        );

        let records = f
            .handler
            .handle(command(&[B, A, B], ReconcilePolicy::ForceRefresh))
            .await
            .unwrap();

        assert_eq!(steam_ids(&records), vec![B, A]);
        assert_eq!(records[0].steam_playtime_seconds, Some(120));
        assert_eq!(records[1].steam_playtime_seconds, Some(60));
        assert_eq!(f.repository.len(), 2);
        assert_eq!(f.provider.calls_for(B), 2);
    }

    #[tokio::test]
    async fn force_refresh_keeps_moderation_value_and_existing_steam_value() {
        let f = fixture(MockPlaytimeProvider::new().with_failure(A));
        let game = GameId::new(GAME);
        f.repository
            .upsert(&SteamId::new(A), game, &PlaytimeObservation::steam(Some(500)))
            .await
            .unwrap();
        f.repository
            .upsert(&SteamId::new(A), game, &PlaytimeObservation::moderation(42))
            .await
            .unwrap();

        let records = f
            .handler
            .handle(command(&[A], ReconcilePolicy::ForceRefresh))
            .await
            .unwrap();

        assert_eq!(records[0].steam_playtime_seconds, Some(500));
        assert_eq!(records[0].bm_playtime_seconds, Some(42));
    }

    #[tokio::test]
    async fn no_observation_still_creates_record() {
        let f = fixture(MockPlaytimeProvider::new());

        let records = f
            .handler
            .handle(command(&[C], ReconcilePolicy::ForceRefresh))
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].steam_playtime_seconds, None);
        assert_eq!(records[0].bm_playtime_seconds, None);
    }

    #[tokio::test]
    async fn one_failing_player_degrades_to_null() {
        let f = fixture(
            MockPlaytimeProvider::new()
                .with_recent(A, GAME, 60)
                .with_failure(B)
                .with_recent(C, GAME, 180),
        );

        let records = f
            .handler
            .handle(command(&[A, B, C], ReconcilePolicy::ForceRefresh))
            .await
            .unwrap();

        assert_eq!(records.len(), 3);
        let nulls = records
            .iter()
            .filter(|r| r.steam_playtime_seconds.is_none())
            .count();
        assert_eq!(nulls, 1);
        assert_eq!(records[1].steam_id.as_str(), B);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // FetchUnknownOnly
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn fetch_unknown_only_skips_known_players() {
        let f = fixture(
            MockPlaytimeProvider::new()
                .with_recent(A, GAME, 999)
                .with_recent(B, GAME, 60),
        );
        f.repository
            .upsert(&SteamId::new(A), GameId::new(GAME), &PlaytimeObservation::moderation(10))
            .await
            .unwrap();

        let records = f
            .handler
            .handle(command(&[A, B], ReconcilePolicy::FetchUnknownOnly))
            .await
            .unwrap();

        assert_eq!(steam_ids(&records), vec![A, B]);
        assert_eq!(records[0].steam_playtime_seconds, None);
        assert_eq!(records[0].bm_playtime_seconds, Some(10));
        assert_eq!(records[1].steam_playtime_seconds, Some(60));
        assert_eq!(f.provider.calls_for(A), 0);
        assert_eq!(f.provider.calls_for(B), 1);
    }

    #[tokio::test]
    async fn fetch_unknown_only_with_all_known_makes_no_calls() {
        let f = fixture(MockPlaytimeProvider::new());
        f.repository
            .upsert(&SteamId::new(A), GameId::new(GAME), &PlaytimeObservation::moderation(10))
            .await
            .unwrap();

        let records = f
            .handler
            .handle(command(&[A], ReconcilePolicy::FetchUnknownOnly))
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(f.provider.call_count(), 0);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // refresh_one
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn refresh_one_upserts_single_player() {
        let f = fixture(MockPlaytimeProvider::new().with_owned(A, GAME, 300));

        let record = f
            .handler
            .refresh_one(&SteamId::new(A), GameId::new(GAME))
            .await
            .unwrap();

        assert_eq!(record.steam_playtime_seconds, Some(300));
        assert_eq!(f.repository.len(), 1);
    }

    #[tokio::test]
    async fn empty_request_returns_empty() {
        let f = fixture(MockPlaytimeProvider::new());

        let records = f
            .handler
            .handle(command(&[], ReconcilePolicy::ForceRefresh))
            .await
            .unwrap();

        assert!(records.is_empty());
        assert_eq!(f.provider.call_count(), 0);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Storage failures
    // ════════════════════════════════════════════════════════════════════════════

    struct FailingRepository;

    #[async_trait]
    impl PlaytimeRepository for FailingRepository {
        async fn upsert(
            &self,
            _steam_id: &SteamId,
            _game_id: GameId,
            _observation: &PlaytimeObservation,
        ) -> Result<PlaytimeRecord, DomainError> {
            Err(DomainError::database("connection refused"))
        }

        async fn upsert_batch(
            &self,
            _game_id: GameId,
            _observations: &[(SteamId, PlaytimeObservation)],
        ) -> Result<Vec<PlaytimeRecord>, DomainError> {
            Err(DomainError::database("connection refused"))
        }

        async fn find_many(
            &self,
            _steam_ids: &[SteamId],
            _game_id: GameId,
        ) -> Result<Vec<PlaytimeRecord>, DomainError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn storage_failure_is_infrastructure_error() {
        let fetcher = Arc::new(PlaytimeFetcher::new(Arc::new(MockPlaytimeProvider::new())));
        let handler = ReconcilePlaytimeHandler::new(fetcher, Arc::new(FailingRepository));

        let err = handler
            .handle(command(&[A], ReconcilePolicy::FetchUnknownOnly))
            .await
            .unwrap_err();

        assert!(matches!(err, PlaytimeError::Infrastructure(_)));
    }
}
