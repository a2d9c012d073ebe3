//! Playtime-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | EndpointNotFound | 404 |
//! | EndpointDisabled | 403 |
//! | Authentication | 400 |
//! | ValidationFailed | 400 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};
use crate::domain::signature::AuthRejection;

/// Errors surfaced by the playtime endpoints.
///
/// Provider failures never appear here: they degrade to "no observation".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaytimeError {
    /// No endpoint is registered under the requested path.
    EndpointNotFound(String),

    /// The endpoint exists but is switched off.
    EndpointDisabled(String),

    /// Request signature authentication failed.
    Authentication(AuthRejection),

    /// Request body failed shape or range validation.
    ValidationFailed { field: String, message: String },

    /// Storage or wiring failure.
    Infrastructure(String),
}

impl PlaytimeError {
    pub fn endpoint_not_found(path: impl Into<String>) -> Self {
        PlaytimeError::EndpointNotFound(path.into())
    }

    pub fn endpoint_disabled(path: impl Into<String>) -> Self {
        PlaytimeError::EndpointDisabled(path.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        PlaytimeError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            PlaytimeError::EndpointNotFound(path) => format!("Endpoint not found: {}", path),
            PlaytimeError::EndpointDisabled(path) => format!("Endpoint is disabled: {}", path),
            PlaytimeError::Authentication(reason) => reason.to_string(),
            PlaytimeError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            PlaytimeError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for PlaytimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for PlaytimeError {}

impl From<AuthRejection> for PlaytimeError {
    fn from(reason: AuthRejection) -> Self {
        PlaytimeError::Authentication(reason)
    }
}

impl From<ValidationError> for PlaytimeError {
    fn from(err: ValidationError) -> Self {
        PlaytimeError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for PlaytimeError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => PlaytimeError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            ErrorCode::DatabaseError => PlaytimeError::Infrastructure(err.to_string()),
        }
    }
}
