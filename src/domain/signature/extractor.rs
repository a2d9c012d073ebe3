//! Token extraction from raw signature header values.
//!
//! A header such as `t=<timestamp>,s=<signature>` is handled by configuring
//! one pattern per token; the extractor knows nothing about the segment
//! layout beyond what a pattern encodes.

use regex::Regex;

/// Signature token inside a comma-joined `t=...,s=...` header.
pub const SEGMENT_SIGNATURE_PATTERN: &str = r"(?:^|,)s=([0-9A-Za-z_]+)(?:,|$)";

/// Timestamp token inside a comma-joined `t=...,s=...` header.
pub const SEGMENT_TIMESTAMP_PATTERN: &str = r"(?:^|,)t=([0-9A-Za-z_\-:.+]+)(?:,|$)";

/// Treats the whole header value as the token.
pub const WHOLE_HEADER_PATTERN: &str = r".*";

/// A compiled extraction pattern.
///
/// When the pattern has a capture group the first group is the token,
/// otherwise the whole match is.
#[derive(Debug, Clone)]
pub struct SignaturePattern {
    regex: Regex,
}

impl SignaturePattern {
    /// Compiles an extraction pattern.
    pub fn compile(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    /// Returns the first token the pattern finds in `header`.
    pub fn extract<'a>(&self, header: &'a str) -> Option<&'a str> {
        let captures = self.regex.captures(header)?;
        captures
            .get(1)
            .or_else(|| captures.get(0))
            .map(|m| m.as_str())
    }

    /// Returns the source pattern.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}
