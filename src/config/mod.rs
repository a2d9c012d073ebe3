//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `PLAYTIME_` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use playtime_service::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod database;
mod error;
mod features;
mod server;
mod signature;
mod steam;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use features::FeatureFlags;
pub use server::{Environment, ServerConfig};
pub use signature::SignatureConfig;
pub use steam::SteamConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Steam Web API configuration
    pub steam: SteamConfig,

    /// Request signature verification
    #[serde(default)]
    pub signature: SignatureConfig,

    /// Feature flags
    #[serde(default)]
    pub features: FeatureFlags,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `PLAYTIME` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `PLAYTIME__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `PLAYTIME__STEAM__API_KEY=...` -> `steam.api_key = ...`
    /// - `PLAYTIME__FEATURES__ENABLE_SIGNATURE_VALIDATION=false`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PLAYTIME")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Performs semantic validation of configuration:
    /// - Bind address and URL formats
    /// - Pool size constraints
    /// - Signature pattern compilation
    /// - Positive timeouts and lookup concurrency
    /// - Steam lookups for a full-size query fitting inside the request timeout
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.steam.validate()?;
        self.signature.validate()?;

        let worst_case = self.steam.worst_case_fan_out();
        if worst_case >= self.server.request_timeout() {
            return Err(ValidationError::LookupBudgetExceedsRequestTimeout {
                worst_case_secs: worst_case.as_secs(),
                request_timeout_secs: self.server.request_timeout_secs,
            });
        }
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Helper to set environment variables for testing
    /// Uses double underscores to separate nested config values
    fn set_minimal_env() {
        env::set_var("PLAYTIME__DATABASE__URL", "postgresql://test@localhost/test");
        env::set_var("PLAYTIME__STEAM__API_KEY", "0123456789ABCDEF");
    }

    /// Helper to clear environment variables after testing
    fn clear_env() {
        env::remove_var("PLAYTIME__DATABASE__URL");
        env::remove_var("PLAYTIME__STEAM__API_KEY");
        env::remove_var("PLAYTIME__SERVER__PORT");
        env::remove_var("PLAYTIME__SERVER__ENVIRONMENT");
        env::remove_var("PLAYTIME__FEATURES__ENABLE_SIGNATURE_VALIDATION");
        env::remove_var("PLAYTIME__SIGNATURE__TIMESTAMP_DEVIATION_SECS");
        env::remove_var("PLAYTIME__STEAM__TIMEOUT_SECS");
        env::remove_var("PLAYTIME__STEAM__MAX_CONCURRENT_LOOKUPS");
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.database.url, "postgresql://test@localhost/test");
        assert_eq!(config.steam.api_key.expose_secret(), "0123456789ABCDEF");
    }

    #[test]
    fn test_validate_full_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.signature.header_name, "X-Signature");
        assert_eq!(config.signature.timestamp_deviation_secs, 300);
        assert!(config.features.enable_signature_validation);
    }

    #[test]
    fn test_signature_validation_can_be_disabled() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("PLAYTIME__FEATURES__ENABLE_SIGNATURE_VALIDATION", "false");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(!config.features.enable_signature_validation);
    }

    #[test]
    fn test_custom_values() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("PLAYTIME__SERVER__PORT", "3000");
        env::set_var("PLAYTIME__SERVER__ENVIRONMENT", "production");
        env::set_var("PLAYTIME__SIGNATURE__TIMESTAMP_DEVIATION_SECS", "60");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.is_production());
        assert_eq!(config.signature.timestamp_deviation_secs, 60);
    }

    #[test]
    fn test_lookup_budget_must_fit_request_timeout() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("PLAYTIME__STEAM__TIMEOUT_SECS", "10");
        env::set_var("PLAYTIME__STEAM__MAX_CONCURRENT_LOOKUPS", "16");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::LookupBudgetExceedsRequestTimeout {
                worst_case_secs: 160,
                request_timeout_secs: 30,
            })
        ));
    }

    #[test]
    fn test_missing_steam_key_fails() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("PLAYTIME__DATABASE__URL", "postgresql://test@localhost/test");
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_err());
    }
}
