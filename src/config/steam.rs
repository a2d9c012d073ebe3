//! Steam Web API configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::playtime::MAX_STEAM_IDS_PER_QUERY;

/// Steam provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SteamConfig {
    /// Web API key
    pub api_key: Secret<String>,

    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum in-flight player lookups per reconciliation
    #[serde(default = "default_max_concurrent_lookups")]
    pub max_concurrent_lookups: usize,
}

impl SteamConfig {
    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Worst-case wall time of one full-size query against a hanging API:
    /// every wave of lookups waits out both sequential calls.
    pub fn worst_case_fan_out(&self) -> Duration {
        let per_wave = self.max_concurrent_lookups.max(1);
        let waves = MAX_STEAM_IDS_PER_QUERY.div_ceil(per_wave) as u32;
        self.timeout() * 2 * waves
    }

    /// Validate Steam configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(ValidationError::MissingRequired("STEAM_API_KEY"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidSteamBaseUrl);
        }
        if self.timeout_secs == 0 || self.timeout_secs > 120 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.max_concurrent_lookups == 0 || self.max_concurrent_lookups > 256 {
            return Err(ValidationError::InvalidLookupConcurrency);
        }
        Ok(())
    }
}

fn default_base_url() -> String {
    "https://api.steampowered.com".to_string()
}

fn default_timeout() -> u64 {
    5
}

fn default_max_concurrent_lookups() -> usize {
    MAX_STEAM_IDS_PER_QUERY
}
