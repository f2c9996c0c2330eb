//! # Content-Addressed Digests
//!
//! Defines [`ContentDigest`], the 32-byte SHA-256 digest used as the
//! uniqueness key of the attribution ledger, and [`Sha256Accumulator`],
//! the incremental hasher all digest computation flows through.
//!
//! ## Security Invariant
//!
//! Every digest in the system is produced by feeding explicit,
//! separator-delimited fields through [`Sha256Accumulator`]. Callers never
//! concatenate fields by hand into a single buffer, which rules out
//! ambiguous encodings where two distinct field sets produce identical
//! input bytes.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::CoreError;

/// Length in bytes of every digest in the system (SHA-256 output).
pub const DIGEST_LEN: usize = 32;

/// A 32-byte SHA-256 content digest.
///
/// Serialized as a lowercase hex string. The raw bytes are private; use
/// [`as_bytes`](Self::as_bytes) for verification paths that need them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentDigest([u8; DIGEST_LEN]);

impl ContentDigest {
    /// Wrap raw digest bytes.
    pub fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// Compute the digest of a single byte string.
    pub fn sha256(bytes: &[u8]) -> Self {
        let mut acc = Sha256Accumulator::new();
        acc.update(bytes);
        acc.finalize()
    }

    /// Compute the digest of a sequence of fields, inserting a `0x1f`
    /// unit separator between consecutive fields.
    ///
    /// The separator prevents field-boundary ambiguity: `["ab", "c"]` and
    /// `["a", "bc"]` hash to different digests.
    pub fn compute(fields: &[&[u8]]) -> Self {
        let mut acc = Sha256Accumulator::new();
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                acc.update(&[0x1f]);
            }
            acc.update(field);
        }
        acc.finalize()
    }

    /// Access the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Return the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Parse a digest from a 64-character lowercase hex string.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidDigest`] if the string is not exactly
    /// 64 hex characters.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        // Byte-wise decoding: multi-byte UTF-8 of the right total length
        // must be rejected, not sliced mid-character.
        if s.len() != DIGEST_LEN * 2 || !s.is_ascii() {
            return Err(CoreError::InvalidDigest(s.to_string()));
        }
        let raw = s.as_bytes();
        let mut bytes = [0u8; DIGEST_LEN];
        for (i, byte) in bytes.iter_mut().enumerate() {
            let hi = hex_nibble(raw[i * 2]);
            let lo = hex_nibble(raw[i * 2 + 1]);
            match (hi, lo) {
                (Some(hi), Some(lo)) => *byte = (hi << 4) | lo,
                _ => return Err(CoreError::InvalidDigest(s.to_string())),
            }
        }
        Ok(Self(bytes))
    }
}

fn hex_nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for ContentDigest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ContentDigest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::from_hex(&raw).map_err(serde::de::Error::custom)
    }
}

/// Incremental SHA-256 hasher.
///
/// Thin wrapper over `sha2::Sha256` so digest construction sites read the
/// same everywhere and finalization always lands in a [`ContentDigest`].
#[derive(Debug, Default)]
pub struct Sha256Accumulator {
    inner: Sha256,
}

impl Sha256Accumulator {
    /// Create a fresh accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed bytes into the hash state.
    pub fn update(&mut self, bytes: &[u8]) {
        self.inner.update(bytes);
    }

    /// Consume the accumulator and produce the digest.
    pub fn finalize(self) -> ContentDigest {
        let out = self.inner.finalize();
        let mut bytes = [0u8; DIGEST_LEN];
        bytes.copy_from_slice(&out);
        ContentDigest(bytes)
    }

    /// Consume the accumulator and produce a lowercase hex digest string.
    pub fn finalize_hex(self) -> String {
        self.finalize().to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn compute_is_deterministic() {
        let a = ContentDigest::compute(&[b"payload", b"context"]);
        let b = ContentDigest::compute(&[b"payload", b"context"]);
        assert_eq!(a, b);
    }

    #[test]
    fn field_boundaries_are_unambiguous() {
        let a = ContentDigest::compute(&[b"ab", b"c"]);
        let b = ContentDigest::compute(&[b"a", b"bc"]);
        assert_ne!(a, b, "separator must disambiguate field boundaries");
    }

    #[test]
    fn hex_roundtrip() {
        let digest = ContentDigest::compute(&[b"roundtrip"]);
        let hex = digest.to_hex();
        assert_eq!(hex.len(), 64);
        let parsed = ContentDigest::from_hex(&hex).unwrap();
        assert_eq!(digest, parsed);
    }

    #[test]
    fn from_hex_rejects_wrong_length() {
        assert!(ContentDigest::from_hex("abcd").is_err());
    }

    #[test]
    fn from_hex_rejects_non_hex() {
        let bad = "zz".repeat(32);
        assert!(ContentDigest::from_hex(&bad).is_err());
    }

    #[test]
    fn from_hex_rejects_multibyte_utf8_of_right_byte_length() {
        // "€" is three bytes; 1 + 21 × 3 = 64 bytes, same as a valid
        // digest string. Must error, not panic on a char boundary.
        let sneaky = format!("0{}", "€".repeat(21));
        assert_eq!(sneaky.len(), 64);
        assert!(ContentDigest::from_hex(&sneaky).is_err());

        let two_byte = "é".repeat(32);
        assert_eq!(two_byte.len(), 64);
        assert!(ContentDigest::from_hex(&two_byte).is_err());
    }

    #[test]
    fn deserialize_rejects_multibyte_utf8_digest() {
        let json = format!("\"0{}\"", "€".repeat(21));
        let result: Result<ContentDigest, _> = serde_json::from_str(&json);
        assert!(result.is_err());
    }

    #[test]
    fn from_hex_accepts_uppercase() {
        let digest = ContentDigest::compute(&[b"case"]);
        let upper = digest.to_hex().to_uppercase();
        assert_eq!(ContentDigest::from_hex(&upper).unwrap(), digest);
    }

    #[test]
    fn serde_roundtrip_as_hex_string() {
        let digest = ContentDigest::compute(&[b"serde"]);
        let json = serde_json::to_string(&digest).unwrap();
        assert!(json.contains(&digest.to_hex()));
        let back: ContentDigest = serde_json::from_str(&json).unwrap();
        assert_eq!(digest, back);
    }

    #[test]
    fn accumulator_matches_compute_for_single_field() {
        let mut acc = Sha256Accumulator::new();
        acc.update(b"single");
        assert_eq!(acc.finalize(), ContentDigest::compute(&[b"single"]));
        assert_eq!(ContentDigest::sha256(b"single"), ContentDigest::compute(&[b"single"]));
    }

    proptest! {
        #[test]
        fn hex_roundtrip_holds_for_arbitrary_bytes(bytes in proptest::array::uniform32(any::<u8>())) {
            let digest = ContentDigest::from_bytes(bytes);
            let parsed = ContentDigest::from_hex(&digest.to_hex()).unwrap();
            prop_assert_eq!(digest, parsed);
        }

        #[test]
        fn from_hex_never_panics_on_arbitrary_strings(s in ".*") {
            let _ = ContentDigest::from_hex(&s);
        }

        #[test]
        fn distinct_inputs_rarely_collide(a in any::<Vec<u8>>(), b in any::<Vec<u8>>()) {
            prop_assume!(a != b);
            prop_assert_ne!(
                ContentDigest::compute(&[&a]),
                ContentDigest::compute(&[&b])
            );
        }
    }
}
