//! Inbound request authentication.
//!
//! Two schemes share one contract, `authenticate(headers, body)`:
//!
//! - **Plain**: the signature covers the raw body.
//! - **Timestamped**: the header also carries a timestamp token, the signature
//!   covers `"<timestamp>." + body`, and the timestamp must fall inside the
//!   replay window.
//!
//! The scheme is chosen from configuration: an [`AuthConfig`] with a timestamp
//! binding yields the timestamped scheme.

use chrono::{DateTime, Utc};
use http::HeaderMap;
use secrecy::{ExposeSecret, Secret};

use super::errors::AuthRejection;
use super::extractor::SignaturePattern;
use super::hmac_verifier::{verify_signature, HashAlgorithm};
use super::timestamp_window::TimestampWindow;

/// Timestamp requirements for the timestamped scheme.
#[derive(Debug, Clone)]
pub struct TimestampBinding {
    pub pattern: SignaturePattern,
    pub window: TimestampWindow,
}

/// Per-endpoint authentication settings.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub header_name: String,
    pub signature_pattern: SignaturePattern,
    pub timestamp: Option<TimestampBinding>,
    pub secret: Secret<String>,
    pub algorithm: HashAlgorithm,
}

/// Signature lookup shared by both schemes.
#[derive(Debug, Clone)]
pub struct SignatureScheme {
    header_name: String,
    signature_pattern: SignaturePattern,
    secret: Secret<String>,
    algorithm: HashAlgorithm,
}

impl SignatureScheme {
    fn header_text(&self, headers: &HeaderMap) -> Result<String, AuthRejection> {
        headers
            .get(self.header_name.as_str())
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .ok_or(AuthRejection::MissingHeader)
    }

    fn signature<'a>(&self, header: &'a str) -> Result<&'a str, AuthRejection> {
        self.signature_pattern
            .extract(header)
            .ok_or(AuthRejection::MissingSignature)
    }

    fn verify(&self, parts: &[&[u8]], presented: &str) -> Result<(), AuthRejection> {
        if verify_signature(
            self.algorithm,
            self.secret.expose_secret().as_bytes(),
            parts,
            presented,
        ) {
            Ok(())
        } else {
            Err(AuthRejection::SignatureMismatch)
        }
    }
}

/// Verifies that a request was signed by a holder of the endpoint secret.
#[derive(Debug, Clone)]
pub enum RequestAuthenticator {
    /// Signature over the raw body.
    Plain(SignatureScheme),
    /// Signature over `"<timestamp>." + body`, with a replay window.
    Timestamped {
        scheme: SignatureScheme,
        binding: TimestampBinding,
    },
}

impl RequestAuthenticator {
    /// Selects the scheme described by `config`.
    pub fn from_config(config: AuthConfig) -> Self {
        let scheme = SignatureScheme {
            header_name: config.header_name,
            signature_pattern: config.signature_pattern,
            secret: config.secret,
            algorithm: config.algorithm,
        };
        match config.timestamp {
            Some(binding) => RequestAuthenticator::Timestamped { scheme, binding },
            None => RequestAuthenticator::Plain(scheme),
        }
    }

    /// Authenticates against the current clock.
    pub fn authenticate(&self, headers: &HeaderMap, body: &[u8]) -> Result<(), AuthRejection> {
        self.authenticate_at(headers, body, Utc::now())
    }

    /// Authenticates against an explicit clock reading.
    ///
    /// Checks run in a fixed order and the first failure is returned.
    pub fn authenticate_at(
        &self,
        headers: &HeaderMap,
        body: &[u8],
        now: DateTime<Utc>,
    ) -> Result<(), AuthRejection> {
        match self {
            RequestAuthenticator::Plain(scheme) => {
                let header = scheme.header_text(headers)?;
                let signature = scheme.signature(&header)?;
                scheme.verify(&[body], signature)
            }
            RequestAuthenticator::Timestamped { scheme, binding } => {
                let header = scheme.header_text(headers)?;
                let timestamp = binding
                    .pattern
                    .extract(&header)
                    .ok_or(AuthRejection::MissingTimestamp)?;
                binding.window.validate(timestamp, now)?;
                let signature = scheme.signature(&header)?;
                let prefix = format!("{}.", timestamp);
                scheme.verify(&[prefix.as_bytes(), body], signature)
            }
        }
    }

    /// Whether this authenticator requires a timestamp token.
    pub fn is_timestamped(&self) -> bool {
        matches!(self, RequestAuthenticator::Timestamped { .. })
    }
}
