//! Request signature configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::signature::{
    HashAlgorithm, SignaturePattern, SEGMENT_SIGNATURE_PATTERN, SEGMENT_TIMESTAMP_PATTERN,
    WHOLE_HEADER_PATTERN,
};

/// Signature header layout and verification parameters
#[derive(Debug, Clone, Deserialize)]
pub struct SignatureConfig {
    /// Header carrying the signature
    #[serde(default = "default_header_name")]
    pub header_name: String,

    /// Signature token pattern for moderation pushes (`t=...,s=...`)
    #[serde(default = "default_moderation_signature_pattern")]
    pub moderation_signature_pattern: String,

    /// Timestamp token pattern for moderation pushes
    #[serde(default = "default_moderation_timestamp_pattern")]
    pub moderation_timestamp_pattern: String,

    /// Signature token pattern for playtime queries (whole header by default)
    #[serde(default = "default_query_signature_pattern")]
    pub query_signature_pattern: String,

    /// Accepted clock skew for signed timestamps, in seconds
    #[serde(default = "default_timestamp_deviation")]
    pub timestamp_deviation_secs: i64,

    /// HMAC hash function
    #[serde(default)]
    pub algorithm: HashAlgorithm,
}

impl SignatureConfig {
    /// Validate signature configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.header_name.trim().is_empty() {
            return Err(ValidationError::EmptySignatureHeader);
        }
        // The window takes the magnitude; zero accepts nothing.
        if self.timestamp_deviation_secs == 0 {
            return Err(ValidationError::InvalidTimestampDeviation);
        }
        for (name, pattern) in [
            ("moderation_signature_pattern", &self.moderation_signature_pattern),
            ("moderation_timestamp_pattern", &self.moderation_timestamp_pattern),
            ("query_signature_pattern", &self.query_signature_pattern),
        ] {
            SignaturePattern::compile(pattern).map_err(|e| {
                ValidationError::InvalidSignaturePattern {
                    name,
                    reason: e.to_string(),
                }
            })?;
        }
        Ok(())
    }
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self {
            header_name: default_header_name(),
            moderation_signature_pattern: default_moderation_signature_pattern(),
            moderation_timestamp_pattern: default_moderation_timestamp_pattern(),
            query_signature_pattern: default_query_signature_pattern(),
            timestamp_deviation_secs: default_timestamp_deviation(),
            algorithm: HashAlgorithm::default(),
        }
    }
}

fn default_header_name() -> String {
    "X-Signature".to_string()
}

fn default_moderation_signature_pattern() -> String {
    SEGMENT_SIGNATURE_PATTERN.to_string()
}

fn default_moderation_timestamp_pattern() -> String {
    SEGMENT_TIMESTAMP_PATTERN.to_string()
}

fn default_query_signature_pattern() -> String {
    WHOLE_HEADER_PATTERN.to_string()
}

fn default_timestamp_deviation() -> i64 {
    300
}
