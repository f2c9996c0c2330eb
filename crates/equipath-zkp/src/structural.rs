//! # Structural Verifier (Reference Implementation)
//!
//! Validates only the *shape* of a proof: all four components present and
//! non-empty, content hash of the expected digest length. Nothing else.
//!
//! ## Security Warning
//!
//! **NOT CRYPTOGRAPHICALLY SOUND.** A structurally well-formed proof
//! passes regardless of its contents — anyone can fabricate one. This
//! verifier exists so the ledger's gating path can be exercised end to end
//! before a real proof system is integrated, and as the explicit template
//! for what a production verifier must additionally guarantee. Deployments
//! that protect real knowledge must inject a sound verifier behind the
//! same [`ProofVerifier`] trait.

use crate::verifier::{ProofBundle, ProofVerifier};

/// Expected content-hash length in bytes (SHA-256 output).
const EXPECTED_HASH_LEN: usize = 32;

/// Shape-only reference verifier. See the module-level security warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralVerifier;

impl StructuralVerifier {
    /// Create a structural verifier.
    pub fn new() -> Self {
        Self
    }
}

impl ProofVerifier for StructuralVerifier {
    /// Accept iff every proof component is non-empty and the content hash
    /// has the expected digest length. Returns `false` for any malformed
    /// input; never panics.
    fn verify(&self, content_hash: &[u8], _cultural_context: &str, proof: &ProofBundle) -> bool {
        if content_hash.len() != EXPECTED_HASH_LEN {
            return false;
        }
        proof.is_structurally_complete()
    }
}
