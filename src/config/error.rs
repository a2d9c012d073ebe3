//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid host address")]
    InvalidHost,

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Invalid Steam API base URL")]
    InvalidSteamBaseUrl,

    #[error("Steam lookup concurrency must be between 1 and 256")]
    InvalidLookupConcurrency,

    #[error("Signature header name must not be empty")]
    EmptySignatureHeader,

    #[error("Invalid signature pattern '{name}': {reason}")]
    InvalidSignaturePattern { name: &'static str, reason: String },

    #[error("Timestamp deviation must not be zero")]
    InvalidTimestampDeviation,

    #[error("Steam lookups may take {worst_case_secs}s, which does not fit the {request_timeout_secs}s request timeout")]
    LookupBudgetExceedsRequestTimeout {
        worst_case_secs: u64,
        request_timeout_secs: u64,
    },
}
