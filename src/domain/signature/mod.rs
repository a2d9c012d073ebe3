//! Request signature authentication.
//!
//! Building blocks, leaves first:
//!
//! - `extractor` - pulls signature/timestamp tokens out of a header value
//! - `timestamp_window` - replay window check for timestamped signatures
//! - `hmac_verifier` - HMAC computation and constant-time comparison
//! - `authenticator` - the plain and timestamped schemes behind one contract

mod authenticator;
mod errors;
mod extractor;
mod hmac_verifier;
mod timestamp_window;

pub use authenticator::{AuthConfig, RequestAuthenticator, SignatureScheme, TimestampBinding};
pub use errors::AuthRejection;
pub use extractor::{
    SignaturePattern, SEGMENT_SIGNATURE_PATTERN, SEGMENT_TIMESTAMP_PATTERN, WHOLE_HEADER_PATTERN,
};
pub use hmac_verifier::{constant_time_eq, verify_signature, HashAlgorithm};
pub use timestamp_window::{parse_timestamp, TimestampWindow, MAX_DEVIATION_SECS};
