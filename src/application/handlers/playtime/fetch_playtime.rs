//! PlaytimeFetcher - Resolves a player's playtime for one game from the provider.
//!
//! Per player: recent activity first, then the owned catalog; the first
//! positive entry for the game wins. Transport failures, timeouts and
//! panics degrade that player's result to `None` and never touch siblings.

use futures::stream::{self, StreamExt};
use futures::FutureExt;
use std::collections::{HashMap, HashSet};
use std::panic::AssertUnwindSafe;
use std::pin::pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout, timeout_at, Instant};

use crate::domain::foundation::{GameId, SteamId};
use crate::ports::{GamePlaytime, PlaytimeProvider, ProviderError};

/// Tuning for the provider fan-out.
#[derive(Debug, Clone, Copy)]
pub struct FetcherConfig {
    /// Upper bound on in-flight player lookups per `fetch_many` call.
    pub max_concurrency: usize,
    /// Budget for each individual provider call.
    pub lookup_timeout: Duration,
    /// Budget for a whole `fetch_many` call. Players still pending when it
    /// expires resolve to `None`.
    pub fan_out_deadline: Option<Duration>,
}

impl FetcherConfig {
    /// Bounds the fan-out to three quarters of `request_timeout`, leaving the
    /// rest for the batch write and the response.
    pub fn with_request_budget(mut self, request_timeout: Duration) -> Self {
        self.fan_out_deadline = Some(request_timeout * 3 / 4);
        self
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 120,
            lookup_timeout: Duration::from_secs(5),
            fan_out_deadline: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum LookupSource {
    RecentActivity,
    OwnedCatalog,
}

impl LookupSource {
    fn as_str(&self) -> &'static str {
        match self {
            LookupSource::RecentActivity => "recent_activity",
            LookupSource::OwnedCatalog => "owned_catalog",
        }
    }
}

/// Concurrent, failure-isolated playtime lookups.
pub struct PlaytimeFetcher {
    provider: Arc<dyn PlaytimeProvider>,
    config: FetcherConfig,
}

impl PlaytimeFetcher {
    pub fn new(provider: Arc<dyn PlaytimeProvider>) -> Self {
        Self::with_config(provider, FetcherConfig::default())
    }

    pub fn with_config(provider: Arc<dyn PlaytimeProvider>, config: FetcherConfig) -> Self {
        Self { provider, config }
    }

    /// Playtime in seconds for one player, or `None` when nothing positive
    /// was found or the provider could not be reached.
    pub async fn fetch_one(&self, steam_id: &SteamId, game_id: GameId) -> Option<u64> {
        if let Some(seconds) = self
            .lookup(steam_id, game_id, LookupSource::RecentActivity)
            .await
        {
            return Some(seconds);
        }
        self.lookup(steam_id, game_id, LookupSource::OwnedCatalog)
            .await
    }

    /// Fetches every distinct id concurrently.
    ///
    /// The map holds exactly one entry per distinct input id, keyed by id;
    /// completion order is irrelevant. When the fan-out deadline expires,
    /// unfinished lookups are dropped and their players stay `None`.
    pub async fn fetch_many(
        &self,
        steam_ids: &[SteamId],
        game_id: GameId,
    ) -> HashMap<SteamId, Option<u64>> {
        let unique = dedupe_preserving_order(steam_ids);
        let mut results: HashMap<SteamId, Option<u64>> =
            unique.iter().map(|id| (id.clone(), None)).collect();
        let deadline = self
            .config
            .fan_out_deadline
            .map(|budget| Instant::now() + budget);

        let mut pending = pin!(stream::iter(unique.into_iter().map(|steam_id| async move {
            let outcome = AssertUnwindSafe(self.fetch_one(&steam_id, game_id))
                .catch_unwind()
                .await;
            (steam_id, outcome)
        }))
        .buffer_unordered(self.config.max_concurrency.max(1)));

        let mut finished = 0usize;
        loop {
            let next = match deadline {
                Some(deadline) => match timeout_at(deadline, pending.next()).await {
                    Ok(next) => next,
                    Err(_) => {
                        tracing::warn!(
                            game_id = %game_id,
                            finished,
                            unfinished = results.len() - finished,
                            "Playtime fan-out deadline reached, pending players get no observation"
                        );
                        break;
                    }
                },
                None => pending.next().await,
            };
            let Some((steam_id, outcome)) = next else {
                break;
            };
            finished += 1;

            match outcome {
                Ok(seconds) => {
                    results.insert(steam_id, seconds);
                }
                Err(_) => {
                    tracing::error!(
                        steam_id = %steam_id,
                        game_id = %game_id,
                        "Playtime lookup panicked, treating as no observation"
                    );
                }
            }
        }

        results
    }

    async fn lookup(
        &self,
        steam_id: &SteamId,
        game_id: GameId,
        source: LookupSource,
    ) -> Option<u64> {
        let call = match source {
            LookupSource::RecentActivity => self.provider.recent_activity(steam_id),
            LookupSource::OwnedCatalog => self.provider.owned_catalog(steam_id),
        };

        let result = match timeout(self.config.lookup_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout {
                timeout_ms: self.config.lookup_timeout.as_millis() as u64,
            }),
        };

        match result {
            Ok(games) => positive_playtime(&games, game_id),
            Err(error) => {
                tracing::warn!(
                    steam_id = %steam_id,
                    game_id = %game_id,
                    source = source.as_str(),
                    error = %error,
                    "Playtime lookup failed"
                );
                None
            }
        }
    }
}

/// A reported zero counts as "not played yet".
fn positive_playtime(games: &[GamePlaytime], game_id: GameId) -> Option<u64> {
    games
        .iter()
        .find(|game| game.game_id == game_id && game.playtime_seconds > 0)
        .map(|game| game.playtime_seconds)
}

/// Drops repeated ids, keeping first occurrences in input order.
pub(crate) fn dedupe_preserving_order(steam_ids: &[SteamId]) -> Vec<SteamId> {
    let mut seen = HashSet::with_capacity(steam_ids.len());
    steam_ids
        .iter()
        .filter(|id| seen.insert(*id))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::steam::{MockLookup, MockPlaytimeProvider};

    const GAME: i64 = 252490;
    const A: &str = "76561198000000001";
    const B: &str = "76561198000000002";
    const C: &str = "76561198000000003";

    fn fetcher(provider: MockPlaytimeProvider) -> PlaytimeFetcher {
        PlaytimeFetcher::new(Arc::new(provider))
    }

    fn ids(raw: &[&str]) -> Vec<SteamId> {
        raw.iter().map(|s| SteamId::new(*s)).collect()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // fetch_one
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn recent_activity_wins_without_owned_lookup() {
        let provider = MockPlaytimeProvider::new()
            .with_recent(A, GAME, 600)
            .with_owned(A, GAME, 900);
        let fetcher = fetcher(provider.clone());

        let result = fetcher.fetch_one(&SteamId::new(A), GameId::new(GAME)).await;

        assert_eq!(result, Some(600));
        assert_eq!(provider.get_calls(), vec![(A.to_string(), MockLookup::Recent)]);
    }

    #[tokio::test]
    async fn falls_back_to_owned_catalog() {
        let provider = MockPlaytimeProvider::new()
            .with_recent(A, 730, 600)
            .with_owned(A, GAME, 900);

        let result = fetcher(provider)
            .fetch_one(&SteamId::new(A), GameId::new(GAME))
            .await;

        assert_eq!(result, Some(900));
    }

    #[tokio::test]
    async fn zero_playtime_is_no_observation() {
        let provider = MockPlaytimeProvider::new()
            .with_recent(A, GAME, 0)
            .with_owned(A, GAME, 0);

        let result = fetcher(provider)
            .fetch_one(&SteamId::new(A), GameId::new(GAME))
            .await;

        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn zero_in_recent_falls_through_to_owned() {
        let provider = MockPlaytimeProvider::new()
            .with_recent(A, GAME, 0)
            .with_owned(A, GAME, 120);

        let result = fetcher(provider)
            .fetch_one(&SteamId::new(A), GameId::new(GAME))
            .await;

        assert_eq!(result, Some(120));
    }

    #[tokio::test]
    async fn provider_failure_is_no_observation() {
        let provider = MockPlaytimeProvider::new().with_failure(A);

        let result = fetcher(provider)
            .fetch_one(&SteamId::new(A), GameId::new(GAME))
            .await;

        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn slow_provider_times_out_to_no_observation() {
        let provider = MockPlaytimeProvider::new()
            .with_recent(A, GAME, 600)
            .with_delay(Duration::from_millis(200));
        let fetcher = PlaytimeFetcher::with_config(
            Arc::new(provider),
            FetcherConfig {
                max_concurrency: 4,
                lookup_timeout: Duration::from_millis(20),
                fan_out_deadline: None,
            },
        );

        let result = fetcher.fetch_one(&SteamId::new(A), GameId::new(GAME)).await;

        assert_eq!(result, None);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // fetch_many
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn one_failure_does_not_affect_siblings() {
        let provider = MockPlaytimeProvider::new()
            .with_recent(A, GAME, 60)
            .with_failure(B)
            .with_owned(C, GAME, 180);

        let results = fetcher(provider)
            .fetch_many(&ids(&[A, B, C]), GameId::new(GAME))
            .await;

        assert_eq!(results.len(), 3);
        assert_eq!(results[&SteamId::new(A)], Some(60));
        assert_eq!(results[&SteamId::new(B)], None);
        assert_eq!(results[&SteamId::new(C)], Some(180));
        assert_eq!(results.values().filter(|v| v.is_none()).count(), 1);
    }

    #[tokio::test]
    async fn panicking_lookup_is_isolated() {
        let provider = MockPlaytimeProvider::new()
            .with_recent(A, GAME, 60)
            .with_panic(B);

        let results = fetcher(provider)
            .fetch_many(&ids(&[A, B]), GameId::new(GAME))
            .await;

        assert_eq!(results[&SteamId::new(A)], Some(60));
        assert_eq!(results[&SteamId::new(B)], None);
    }

    #[tokio::test]
    async fn duplicate_ids_are_fetched_once() {
        let provider = MockPlaytimeProvider::new().with_recent(A, GAME, 60);
        let fetcher = fetcher(provider.clone());

        let results = fetcher
            .fetch_many(&ids(&[A, A, A]), GameId::new(GAME))
            .await;

        assert_eq!(results.len(), 1);
        assert_eq!(provider.calls_for(A), 1);
    }

    #[tokio::test]
    async fn lookups_run_concurrently() {
        let provider = MockPlaytimeProvider::new().with_delay(Duration::from_millis(100));
        let fetcher = PlaytimeFetcher::with_config(
            Arc::new(provider),
            FetcherConfig {
                max_concurrency: 8,
                lookup_timeout: Duration::from_secs(5),
                fan_out_deadline: None,
            },
        );

        let started = std::time::Instant::now();
        let results = fetcher
            .fetch_many(&ids(&[A, B, C]), GameId::new(GAME))
            .await;

        // Three players at two sequential 100ms lookups each would take 600ms serially.
        assert_eq!(results.len(), 3);
        assert!(started.elapsed() < Duration::from_millis(500));
    }

    #[tokio::test]
    async fn fan_out_deadline_resolves_pending_players_to_none() {
        let provider = MockPlaytimeProvider::new()
            .with_recent(A, GAME, 60)
            .with_recent(B, GAME, 60)
            .with_delay(Duration::from_secs(5));
        let fetcher = PlaytimeFetcher::with_config(
            Arc::new(provider),
            FetcherConfig {
                max_concurrency: 1,
                lookup_timeout: Duration::from_secs(10),
                fan_out_deadline: Some(Duration::from_millis(100)),
            },
        );

        let started = std::time::Instant::now();
        let results = fetcher
            .fetch_many(&ids(&[A, B]), GameId::new(GAME))
            .await;

        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(results.len(), 2);
        assert!(results.values().all(|seconds| seconds.is_none()));
    }

    #[tokio::test]
    async fn fan_out_deadline_keeps_finished_results() {
        let fast = MockPlaytimeProvider::new().with_recent(A, GAME, 60);
        let fetcher = PlaytimeFetcher::with_config(
            Arc::new(fast),
            FetcherConfig::default().with_request_budget(Duration::from_secs(4)),
        );

        let results = fetcher.fetch_many(&ids(&[A]), GameId::new(GAME)).await;

        assert_eq!(results[&SteamId::new(A)], Some(60));
    }

    #[test]
    fn request_budget_sets_deadline_below_request_timeout() {
        let config = FetcherConfig::default().with_request_budget(Duration::from_secs(30));
        assert_eq!(config.fan_out_deadline, Some(Duration::from_millis(22_500)));
    }

    #[test]
    fn dedupe_keeps_first_occurrence_order() {
        let deduped = dedupe_preserving_order(&ids(&[B, A, B, C, A]));
        assert_eq!(deduped, ids(&[B, A, C]));
    }
}
