//! Request signature rejection reasons.

use thiserror::Error;

/// Why an inbound request failed signature authentication.
///
/// Reasons are reported in the order the checks run; the first failing check
/// wins and later checks are not attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthRejection {
    /// The configured signature header is absent.
    #[error("Signature header not found")]
    MissingHeader,

    /// The header is present but the signature token could not be extracted.
    #[error("Signature not found in signature header")]
    MissingSignature,

    /// The recomputed signature does not match the presented one.
    #[error("Request body, signature or secret key is corrupted, signature does not match")]
    SignatureMismatch,

    /// The header carries no timestamp token.
    #[error("Timestamp not found in signature header")]
    MissingTimestamp,

    /// The timestamp token is not an ISO-8601 date-time.
    #[error("Timestamp in signature header has invalid format, ISO-8601 required")]
    InvalidTimestampFormat,

    /// The timestamp has no UTC offset.
    #[error("Timestamp in signature header must have a timezone")]
    MissingTimezone,

    /// The timestamp is too old or too far in the future.
    #[error("Timestamp is too old or too far in the future")]
    TimestampOutOfWindow,
}

impl AuthRejection {
    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            AuthRejection::MissingHeader => "MISSING_HEADER",
            AuthRejection::MissingSignature => "MISSING_SIGNATURE",
            AuthRejection::SignatureMismatch => "SIGNATURE_MISMATCH",
            AuthRejection::MissingTimestamp => "MISSING_TIMESTAMP",
            AuthRejection::InvalidTimestampFormat => "INVALID_TIMESTAMP_FORMAT",
            AuthRejection::MissingTimezone => "MISSING_TIMEZONE",
            AuthRejection::TimestampOutOfWindow => "TIMESTAMP_OUT_OF_WINDOW",
        }
    }
}
