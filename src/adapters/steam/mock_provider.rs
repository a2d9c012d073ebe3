//! Mock Playtime Provider for testing.
//!
//! Provides a configurable in-process implementation of the PlaytimeProvider
//! port so the fetcher and the HTTP layer can be exercised without Steam.
//!
//! # Features
//!
//! - Per-player recent-activity and owned-catalog lists
//! - Simulated delays for timeout testing
//! - Error injection per player
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let provider = MockPlaytimeProvider::new()
//!     .with_recent("76561198000000001", 252490, 3600)
//!     .with_delay(Duration::from_millis(100));
//!
//! let games = provider.recent_activity(&steam_id).await?;
//! ```

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::foundation::{GameId, SteamId};
use crate::ports::{GamePlaytime, PlaytimeProvider, ProviderError};

/// Which lookup a recorded call went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockLookup {
    Recent,
    Owned,
}

/// Mock playtime provider for testing.
#[derive(Debug, Clone, Default)]
pub struct MockPlaytimeProvider {
    recent: Arc<Mutex<HashMap<String, Vec<GamePlaytime>>>>,
    owned: Arc<Mutex<HashMap<String, Vec<GamePlaytime>>>>,
    /// Players whose every lookup fails.
    failing: Arc<Mutex<HashSet<String>>>,
    /// Players whose lookups panic.
    panicking: Arc<Mutex<HashSet<String>>>,
    /// Simulated latency per lookup.
    delay: Duration,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<(String, MockLookup)>>>,
}

impl MockPlaytimeProvider {
    /// Creates a provider that knows no players.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a recent-activity entry, in seconds.
    pub fn with_recent(self, steam_id: &str, game_id: i64, seconds: u64) -> Self {
        self.recent
            .lock()
            .unwrap()
            .entry(steam_id.to_string())
            .or_default()
            .push(GamePlaytime::new(GameId::new(game_id), seconds));
        self
    }

    /// Adds an owned-catalog entry, in seconds.
    pub fn with_owned(self, steam_id: &str, game_id: i64, seconds: u64) -> Self {
        self.owned
            .lock()
            .unwrap()
            .entry(steam_id.to_string())
            .or_default()
            .push(GamePlaytime::new(GameId::new(game_id), seconds));
        self
    }

    /// Makes every lookup for `steam_id` fail with a network error.
    pub fn with_failure(self, steam_id: &str) -> Self {
        self.failing.lock().unwrap().insert(steam_id.to_string());
        self
    }

    /// Makes every lookup for `steam_id` panic.
    pub fn with_panic(self, steam_id: &str) -> Self {
        self.panicking.lock().unwrap().insert(steam_id.to_string());
        self
    }

    /// Sets simulated latency per lookup.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Total number of lookups made.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Number of lookups made for one player.
    pub fn calls_for(&self, steam_id: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| id == steam_id)
            .count()
    }

    /// All recorded lookups in call order.
    pub fn get_calls(&self) -> Vec<(String, MockLookup)> {
        self.calls.lock().unwrap().clone()
    }

    async fn lookup(
        &self,
        steam_id: &SteamId,
        kind: MockLookup,
    ) -> Result<Vec<GamePlaytime>, ProviderError> {
        let key = steam_id.as_str().to_string();
        self.calls.lock().unwrap().push((key.clone(), kind));

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        if self.panicking.lock().unwrap().contains(&key) {
            panic!("mock provider panic for {}", key);
        }
        if self.failing.lock().unwrap().contains(&key) {
            return Err(ProviderError::network("mock provider failure"));
        }

        let source = match kind {
            MockLookup::Recent => &self.recent,
            MockLookup::Owned => &self.owned,
        };
        Ok(source.lock().unwrap().get(&key).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl PlaytimeProvider for MockPlaytimeProvider {
    async fn recent_activity(&self, steam_id: &SteamId) -> Result<Vec<GamePlaytime>, ProviderError> {
        self.lookup(steam_id, MockLookup::Recent).await
    }

    async fn owned_catalog(&self, steam_id: &SteamId) -> Result<Vec<GamePlaytime>, ProviderError> {
        self.lookup(steam_id, MockLookup::Owned).await
    }
}
