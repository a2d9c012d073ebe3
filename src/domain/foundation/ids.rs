//! Strongly-typed identifier value objects.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// SteamID64 shape accepted at the API boundary.
static STEAM_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^76\d{15,16}$").expect("steam id pattern is valid"));

/// External player identifier (SteamID64).
///
/// The reconciliation core treats the value as opaque; the shape check lives
/// in [`SteamId::parse`] and is applied by request validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SteamId(String);

impl SteamId {
    /// Wraps an identifier without checking its shape.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Parses an identifier, requiring the `76` prefix followed by 15-16 digits.
    pub fn parse(field: &str, value: &str) -> Result<Self, ValidationError> {
        if value.is_empty() {
            return Err(ValidationError::empty_field(field));
        }
        if !STEAM_ID_PATTERN.is_match(value) {
            return Err(ValidationError::invalid_format(
                field,
                format!("'{}' is not a SteamID64", value),
            ));
        }
        Ok(Self(value.to_string()))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SteamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Game (application) scope a playtime value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(i64);

impl GameId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
