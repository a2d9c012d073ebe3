//! Feature flags configuration

use serde::Deserialize;

/// Feature flags for enabling/disabling functionality
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureFlags {
    /// Verify `X-Signature` on inbound requests. Only switch off in
    /// controlled environments.
    #[serde(default = "default_enable_signature_validation")]
    pub enable_signature_validation: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            enable_signature_validation: default_enable_signature_validation(),
        }
    }
}

fn default_enable_signature_validation() -> bool {
    true
}
