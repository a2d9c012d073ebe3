//! Per-endpoint authenticator construction.
//!
//! Patterns are compiled once at startup; each request only pairs them with
//! the secret of the endpoint it targets.

use secrecy::Secret;

use crate::config::{FeatureFlags, SignatureConfig};
use crate::domain::playtime::EndpointKind;
use crate::domain::signature::{
    AuthConfig, HashAlgorithm, RequestAuthenticator, SignaturePattern, TimestampBinding,
    TimestampWindow, SEGMENT_SIGNATURE_PATTERN, SEGMENT_TIMESTAMP_PATTERN, WHOLE_HEADER_PATTERN,
};

/// Compiled signature settings shared by every request.
#[derive(Debug, Clone)]
pub struct SignatureSettings {
    enabled: bool,
    header_name: String,
    algorithm: HashAlgorithm,
    moderation_signature: SignaturePattern,
    moderation_timestamp: SignaturePattern,
    query_signature: SignaturePattern,
    window: TimestampWindow,
}

impl SignatureSettings {
    /// Compiles the configured patterns.
    pub fn from_config(
        config: &SignatureConfig,
        features: &FeatureFlags,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            enabled: features.enable_signature_validation,
            header_name: config.header_name.clone(),
            algorithm: config.algorithm,
            moderation_signature: SignaturePattern::compile(&config.moderation_signature_pattern)?,
            moderation_timestamp: SignaturePattern::compile(&config.moderation_timestamp_pattern)?,
            query_signature: SignaturePattern::compile(&config.query_signature_pattern)?,
            window: TimestampWindow::from_secs(config.timestamp_deviation_secs),
        })
    }

    /// Default header layout with an explicit deviation.
    pub fn standard(deviation_secs: i64) -> Result<Self, regex::Error> {
        Ok(Self {
            enabled: true,
            header_name: "X-Signature".to_string(),
            algorithm: HashAlgorithm::Sha256,
            moderation_signature: SignaturePattern::compile(SEGMENT_SIGNATURE_PATTERN)?,
            moderation_timestamp: SignaturePattern::compile(SEGMENT_TIMESTAMP_PATTERN)?,
            query_signature: SignaturePattern::compile(WHOLE_HEADER_PATTERN)?,
            window: TimestampWindow::from_secs(deviation_secs),
        })
    }

    /// Turns verification on or off.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Moderation pushes are timestamped; playtime queries are plain.
    pub fn authenticator(&self, kind: EndpointKind, secret: Secret<String>) -> RequestAuthenticator {
        let (signature_pattern, timestamp) = match kind {
            EndpointKind::ModerationPush => (
                self.moderation_signature.clone(),
                Some(TimestampBinding {
                    pattern: self.moderation_timestamp.clone(),
                    window: self.window,
                }),
            ),
            EndpointKind::PlaytimeQuery => (self.query_signature.clone(), None),
        };

        RequestAuthenticator::from_config(AuthConfig {
            header_name: self.header_name.clone(),
            signature_pattern,
            timestamp,
            secret,
            algorithm: self.algorithm,
        })
    }
}
