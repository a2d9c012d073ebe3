//! Steam Provider - Implementation of PlaytimeProvider for the Steam Web API.
//!
//! Uses the `IPlayerService` interface:
//!
//! - `GetRecentlyPlayedGames/v1/` for recent activity
//! - `GetOwnedGames/v1/` for the owned catalog
//!
//! # Configuration
//!
//! ```ignore
//! let config = SteamClientConfig::new(api_key)
//!     .with_base_url("https://api.steampowered.com")
//!     .with_timeout(Duration::from_secs(10));
//!
//! let provider = SteamPlaytimeProvider::new(config)?;
//! ```
//!
//! Steam reports `playtime_forever` in minutes; the adapter converts to
//! seconds before anything leaves this module.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use crate::domain::foundation::{GameId, SteamId};
use crate::ports::{GamePlaytime, PlaytimeProvider, ProviderError};

const RECENT_GAMES_PATH: &str = "IPlayerService/GetRecentlyPlayedGames/v1/";
const OWNED_GAMES_PATH: &str = "IPlayerService/GetOwnedGames/v1/";
const SECONDS_PER_MINUTE: u64 = 60;

/// Configuration for the Steam provider.
#[derive(Debug, Clone)]
pub struct SteamClientConfig {
    /// Web API key.
    api_key: Secret<String>,
    /// Base URL for the API (default: https://api.steampowered.com).
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl SteamClientConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            base_url: "https://api.steampowered.com".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Steam Web API provider implementation.
pub struct SteamPlaytimeProvider {
    config: SteamClientConfig,
    client: Client,
}

impl SteamPlaytimeProvider {
    /// Creates a new provider.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Network` if the HTTP client cannot be built.
    pub fn new(config: SteamClientConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn endpoint_url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Issues one GET against an `IPlayerService` method.
    async fn send_request(
        &self,
        path: &str,
        steam_id: &SteamId,
        include_appinfo: bool,
    ) -> Result<Response, ProviderError> {
        let mut query: Vec<(&str, &str)> = vec![
            ("key", self.config.api_key()),
            ("steamid", steam_id.as_str()),
            ("format", "json"),
        ];
        if include_appinfo {
            query.push(("include_appinfo", "true"));
        }

        self.client
            .get(self.endpoint_url(path))
            .query(&query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout {
                        timeout_ms: self.config.timeout.as_millis() as u64,
                    }
                } else if e.is_connect() {
                    ProviderError::network(format!("Connection failed: {}", e.without_url()))
                } else {
                    // The URL carries the API key; never let it reach the logs.
                    ProviderError::network(e.without_url().to_string())
                }
            })
    }

    async fn fetch_games(
        &self,
        path: &str,
        steam_id: &SteamId,
        include_appinfo: bool,
    ) -> Result<Vec<GamePlaytime>, ProviderError> {
        let response = self.send_request(path, steam_id, include_appinfo).await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(
                steam_id = %steam_id,
                status = status.as_u16(),
                path,
                "Steam API returned non-success status"
            );
            return Err(ProviderError::UnexpectedStatus(status.as_u16()));
        }

        let envelope: SteamEnvelope = response
            .json()
            .await
            .map_err(|e| ProviderError::malformed(format!("Failed to parse response: {}", e.without_url())))?;

        Ok(envelope.into_playtimes())
    }
}

#[async_trait]
impl PlaytimeProvider for SteamPlaytimeProvider {
    async fn recent_activity(&self, steam_id: &SteamId) -> Result<Vec<GamePlaytime>, ProviderError> {
        self.fetch_games(RECENT_GAMES_PATH, steam_id, false).await
    }

    async fn owned_catalog(&self, steam_id: &SteamId) -> Result<Vec<GamePlaytime>, ProviderError> {
        self.fetch_games(OWNED_GAMES_PATH, steam_id, true).await
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Steam API Types
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
struct SteamEnvelope {
    #[serde(default)]
    response: SteamGamesResponse,
}

/// Private profiles answer with an empty `response` object.
#[derive(Debug, Default, Deserialize)]
struct SteamGamesResponse {
    #[serde(default)]
    games: Vec<SteamGame>,
}

#[derive(Debug, Deserialize)]
struct SteamGame {
    appid: i64,
    /// Minutes.
    #[serde(default)]
    playtime_forever: u64,
}

impl SteamEnvelope {
    fn into_playtimes(self) -> Vec<GamePlaytime> {
        self.response
            .games
            .into_iter()
            .map(|game| {
                GamePlaytime::new(
                    GameId::new(game.appid),
                    game.playtime_forever.saturating_mul(SECONDS_PER_MINUTE),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Vec<GamePlaytime> {
        serde_json::from_str::<SteamEnvelope>(body)
            .unwrap()
            .into_playtimes()
    }

    #[test]
    fn converts_minutes_to_seconds() {
        let games = parse(
            r#"{"response":{"total_count":2,"games":[
                {"appid":252490,"name":"Rust","playtime_forever":150,"playtime_2weeks":10},
                {"appid":730,"playtime_forever":0}
            ]}}"#,
        );

        assert_eq!(
            games,
            vec![
                GamePlaytime::new(GameId::new(252490), 9000),
                GamePlaytime::new(GameId::new(730), 0),
            ]
        );
    }

    #[test]
    fn missing_games_list_is_empty() {
        assert!(parse(r#"{"response":{}}"#).is_empty());
        assert!(parse(r#"{}"#).is_empty());
    }

    #[test]
    fn config_builder_sets_fields() {
        let config = SteamClientConfig::new("key")
            .with_base_url("http://localhost:9999/")
            .with_timeout(Duration::from_secs(3));

        assert_eq!(config.base_url, "http://localhost:9999/");
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn endpoint_url_joins_without_double_slash() {
        let provider =
            SteamPlaytimeProvider::new(SteamClientConfig::new("key").with_base_url("http://steam.test/"))
                .unwrap();

        assert_eq!(
            provider.endpoint_url(OWNED_GAMES_PATH),
            "http://steam.test/IPlayerService/GetOwnedGames/v1/"
        );
    }

    #[test]
    fn config_debug_redacts_api_key() {
        let config = SteamClientConfig::new("very-secret-key");
        assert!(!format!("{:?}", config).contains("very-secret-key"));
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        let provider = SteamPlaytimeProvider::new(
            SteamClientConfig::new("key")
                .with_base_url("http://127.0.0.1:1")
                .with_timeout(Duration::from_secs(2)),
        )
        .unwrap();

        let err = provider
            .recent_activity(&SteamId::new("76561198000000001"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ProviderError::Network(_) | ProviderError::Timeout { .. }
        ));
    }
}
