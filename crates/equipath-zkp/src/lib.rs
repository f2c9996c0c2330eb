//! # equipath-zkp — Proof Verification Gateway
//!
//! Defines the capability contract that gates contribution acceptance in
//! the attribution ledger, without prescribing a concrete proof system:
//!
//! - **Contract** ([`verifier`]): the [`ProofVerifier`] strategy trait and
//!   the [`ProofBundle`] structure — three proof parts plus public
//!   signals, all opaque blobs.
//!
//! - **Structural** ([`structural`]): the reference verifier. Checks only
//!   the shape of a proof (component presence, non-emptiness, digest
//!   length) and provides **no cryptographic soundness**.
//!
//! - **Deadline** ([`deadline`]): a decorator that bounds a blocking
//!   verifier call with a wall-clock budget; timeout is verification
//!   failure, never silent success.
//!
//! A production deployment plugs a real proof-system verifier (e.g. a
//! zk-SNARK backend or a network call to a proving service) in behind the
//! same trait at ledger construction time.

pub mod deadline;
pub mod structural;
pub mod verifier;

// Re-export primary types for ergonomic imports.
pub use deadline::DeadlineVerifier;
pub use structural::StructuralVerifier;
pub use verifier::{ProofBundle, ProofVerifier};
