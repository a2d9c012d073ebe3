//! HMAC signature computation and constant-time verification.

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::{Sha256, Sha384, Sha512};
use std::fmt;
use std::str::FromStr;
use subtle::{Choice, ConstantTimeEq};

/// Hash function backing the HMAC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Sha384,
    Sha512,
}

impl HashAlgorithm {
    /// Computes the lowercase hex HMAC of the concatenated `parts`.
    pub fn sign(&self, secret: &[u8], parts: &[&[u8]]) -> String {
        match self {
            HashAlgorithm::Sha256 => {
                let mut mac =
                    Hmac::<Sha256>::new_from_slice(secret).expect("HMAC accepts any key");
                parts.iter().for_each(|part| mac.update(part));
                hex::encode(mac.finalize().into_bytes())
            }
            HashAlgorithm::Sha384 => {
                let mut mac =
                    Hmac::<Sha384>::new_from_slice(secret).expect("HMAC accepts any key");
                parts.iter().for_each(|part| mac.update(part));
                hex::encode(mac.finalize().into_bytes())
            }
            HashAlgorithm::Sha512 => {
                let mut mac =
                    Hmac::<Sha512>::new_from_slice(secret).expect("HMAC accepts any key");
                parts.iter().for_each(|part| mac.update(part));
                hex::encode(mac.finalize().into_bytes())
            }
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha384 => "sha384",
            HashAlgorithm::Sha512 => "sha512",
        };
        f.write_str(s)
    }
}

impl FromStr for HashAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha384" => Ok(HashAlgorithm::Sha384),
            "sha512" => Ok(HashAlgorithm::Sha512),
            other => Err(format!("unsupported hash algorithm: {}", other)),
        }
    }
}

/// Recomputes the HMAC over `parts` and compares it with `presented_hex`.
///
/// The comparison runs over the hex text in constant time.
pub fn verify_signature(
    algorithm: HashAlgorithm,
    secret: &[u8],
    parts: &[&[u8]],
    presented_hex: &str,
) -> bool {
    let expected = algorithm.sign(secret, parts);
    constant_time_eq(expected.as_bytes(), presented_hex.as_bytes())
}

/// Compares two byte strings without early exit.
///
/// Work is proportional to the presented length only: every presented byte is
/// compared against the expected bytes (cycled when lengths differ) and the
/// length check is folded into the same accumulator, so neither the position
/// of the first mismatch nor a length difference changes the amount of work.
pub fn constant_time_eq(expected: &[u8], presented: &[u8]) -> bool {
    let same_len = (expected.len() as u64).ct_eq(&(presented.len() as u64));
    let mut equal = Choice::from(1u8);

    for (index, byte) in presented.iter().enumerate() {
        let reference = if expected.is_empty() {
            0u8
        } else {
            expected[index % expected.len()]
        };
        equal &= reference.ct_eq(byte);
    }

    (equal & same_len).into()
}

/// Computes an HMAC-SHA256 hex signature for use in test fixtures.
#[cfg(test)]
pub fn compute_test_signature(secret: &str, message: &str) -> String {
    HashAlgorithm::Sha256.sign(secret.as_bytes(), &[message.as_bytes()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TEST_SECRET: &str = "hmac_test_secret_12345";

    // ══════════════════════════════════════════════════════════════
    // Signing Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn sha256_matches_known_vector() {
        // RFC 4231 test case 2
        let signature = HashAlgorithm::Sha256.sign(b"Jefe", &[b"what do ya want for nothing?"]);
        assert_eq!(
            signature,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn split_parts_sign_like_concatenation() {
        let joined = HashAlgorithm::Sha256.sign(b"key", &[b"2024-01-01T00:00:00Z.{}"]);
        let split = HashAlgorithm::Sha256.sign(b"key", &[b"2024-01-01T00:00:00Z.", b"{}"]);
        assert_eq!(joined, split);
    }

    #[test]
    fn digest_lengths_follow_algorithm() {
        assert_eq!(HashAlgorithm::Sha256.sign(b"k", &[b"m"]).len(), 64);
        assert_eq!(HashAlgorithm::Sha384.sign(b"k", &[b"m"]).len(), 96);
        assert_eq!(HashAlgorithm::Sha512.sign(b"k", &[b"m"]).len(), 128);
    }

    #[test]
    fn algorithm_parses_case_insensitively() {
        assert_eq!("SHA256".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Sha256));
        assert_eq!("sha512".parse::<HashAlgorithm>(), Ok(HashAlgorithm::Sha512));
        assert!("md5".parse::<HashAlgorithm>().is_err());
    }

    // ══════════════════════════════════════════════════════════════
    // Verification Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn verify_valid_signature() {
        let body = r#"{"steamIds":["76561198000000001"],"gameId":252490}"#;
        let signature = compute_test_signature(TEST_SECRET, body);

        assert!(verify_signature(
            HashAlgorithm::Sha256,
            TEST_SECRET.as_bytes(),
            &[body.as_bytes()],
            &signature
        ));
    }

    #[test]
    fn verify_wrong_secret_fails() {
        let body = r#"{"gameId":1}"#;
        let signature = compute_test_signature("wrong_secret", body);

        assert!(!verify_signature(
            HashAlgorithm::Sha256,
            TEST_SECRET.as_bytes(),
            &[body.as_bytes()],
            &signature
        ));
    }

    #[test]
    fn verify_tampered_body_fails() {
        let signature = compute_test_signature(TEST_SECRET, r#"{"playtime":10}"#);

        assert!(!verify_signature(
            HashAlgorithm::Sha256,
            TEST_SECRET.as_bytes(),
            &[br#"{"playtime":99999}"#],
            &signature
        ));
    }

    #[test]
    fn verify_is_case_sensitive_on_hex() {
        let signature = compute_test_signature(TEST_SECRET, "body").to_uppercase();

        assert!(!verify_signature(
            HashAlgorithm::Sha256,
            TEST_SECRET.as_bytes(),
            &[b"body"],
            &signature
        ));
    }

    // ══════════════════════════════════════════════════════════════
    // Constant Time Comparison Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn constant_time_eq_equal_values() {
        assert!(constant_time_eq(b"abcdef", b"abcdef"));
    }

    #[test]
    fn constant_time_eq_last_byte_differs() {
        assert!(!constant_time_eq(b"abcdef", b"abcdeg"));
    }

    #[test]
    fn constant_time_eq_first_byte_differs() {
        assert!(!constant_time_eq(b"abcdef", b"bbcdef"));
    }

    #[test]
    fn constant_time_eq_prefix_is_not_equal() {
        assert!(!constant_time_eq(b"abcdef", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abcdef"));
    }

    #[test]
    fn constant_time_eq_repeated_prefix_is_not_equal() {
        // cycling the expected value must not make a longer input match
        assert!(!constant_time_eq(b"ab", b"abab"));
    }

    #[test]
    fn constant_time_eq_empty_slices() {
        assert!(constant_time_eq(b"", b""));
        assert!(!constant_time_eq(b"", b"a"));
        assert!(!constant_time_eq(b"a", b""));
    }

    proptest! {
        #[test]
        fn constant_time_eq_agrees_with_slice_equality(
            a in proptest::collection::vec(any::<u8>(), 0..80),
            b in proptest::collection::vec(any::<u8>(), 0..80),
        ) {
            prop_assert_eq!(constant_time_eq(&a, &b), a == b);
        }

        #[test]
        fn any_single_byte_flip_is_detected(
            a in proptest::collection::vec(any::<u8>(), 1..80),
            index in any::<proptest::sample::Index>(),
            flip in 1u8..=255,
        ) {
            let mut b = a.clone();
            let i = index.index(b.len());
            b[i] ^= flip;
            prop_assert!(!constant_time_eq(&a, &b));
        }
    }
}
