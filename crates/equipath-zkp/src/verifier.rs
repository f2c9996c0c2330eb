//! # The Verification Contract
//!
//! [`ProofVerifier`] is the seam between the attribution ledger and
//! whatever proof system the integrator deploys. The ledger calls
//! [`verify`](ProofVerifier::verify) before flipping a contribution's
//! `verified` flag; it never inspects proof contents itself.
//!
//! ## Contract Requirements
//!
//! - `verify` is a pure function of its inputs with no side effects.
//! - It is total: structurally malformed input yields `false`. It never
//!   panics and never returns an error type.
//! - The content hash parameter is raw digest bytes; implementations must
//!   check the expected digest length rather than assume it.

use serde::{Deserialize, Serialize};

/// A proof object in the fixed four-component shape the gateway expects:
/// three proof parts plus the public signals.
///
/// All components are opaque byte blobs. Their internal encoding belongs
/// to the proof system that produced them; the gateway contract only
/// requires presence and non-emptiness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofBundle {
    /// First proof part.
    #[serde(with = "hex_bytes")]
    pub proof_a: Vec<u8>,
    /// Second proof part.
    #[serde(with = "hex_bytes")]
    pub proof_b: Vec<u8>,
    /// Third proof part.
    #[serde(with = "hex_bytes")]
    pub proof_c: Vec<u8>,
    /// Public signals the proof commits to.
    #[serde(with = "hex_bytes")]
    pub public_signals: Vec<u8>,
}

impl ProofBundle {
    /// Whether every component is present and non-empty.
    pub fn is_structurally_complete(&self) -> bool {
        !self.proof_a.is_empty()
            && !self.proof_b.is_empty()
            && !self.proof_c.is_empty()
            && !self.public_signals.is_empty()
    }
}

/// Strategy trait for proof verification, injected into the attribution
/// ledger at construction.
///
/// Implementations must uphold the contract documented at module level:
/// pure, total, `false` on malformed input.
pub trait ProofVerifier: Send + Sync {
    /// Verify `proof` against a content hash and cultural context.
    ///
    /// `content_hash` is the raw digest bytes of the contribution being
    /// gated; `cultural_context` is the context tag the contribution was
    /// submitted under.
    fn verify(&self, content_hash: &[u8], cultural_context: &str, proof: &ProofBundle) -> bool;
}

/// Serde helper for hex-encoding `Vec<u8>` fields.
mod hex_bytes {
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
        serializer.serialize_str(&hex)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        // Byte-wise decoding: multi-byte UTF-8 must error, not be sliced
        // mid-character.
        if s.len() % 2 != 0 || !s.is_ascii() {
            return Err(serde::de::Error::custom("malformed hex string"));
        }
        s.as_bytes()
            .chunks_exact(2)
            .map(|pair| {
                std::str::from_utf8(pair)
                    .ok()
                    .and_then(|p| u8::from_str_radix(p, 16).ok())
                    .ok_or_else(|| serde::de::Error::custom("malformed hex string"))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_bundle() -> ProofBundle {
        ProofBundle {
            proof_a: vec![1, 2],
            proof_b: vec![3, 4],
            proof_c: vec![5, 6],
            public_signals: vec![7, 8],
        }
    }

    #[test]
    fn complete_bundle_is_structurally_complete() {
        assert!(complete_bundle().is_structurally_complete());
    }

    #[test]
    fn empty_component_is_incomplete() {
        let mut bundle = complete_bundle();
        bundle.public_signals.clear();
        assert!(!bundle.is_structurally_complete());
    }

    #[test]
    fn serde_roundtrip_hex_fields() {
        let bundle = complete_bundle();
        let json = serde_json::to_string(&bundle).unwrap();
        assert!(json.contains("\"0102\""));
        let back: ProofBundle = serde_json::from_str(&json).unwrap();
        assert_eq!(bundle, back);
    }

    #[test]
    fn deserialize_rejects_odd_length_hex() {
        let json = r#"{"proof_a":"abc","proof_b":"01","proof_c":"02","public_signals":"03"}"#;
        let result: Result<ProofBundle, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn deserialize_rejects_multibyte_utf8_hex() {
        // "€" is three bytes, so the field is even-length in bytes but
        // not sliceable at two-byte offsets. Must error, not panic.
        let json = r#"{"proof_a":"0€€€","proof_b":"01","proof_c":"02","public_signals":"03"}"#;
        let result: Result<ProofBundle, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
