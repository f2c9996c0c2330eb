//! # equipath-ledger — Content-Addressed Attribution Ledger
//!
//! Records who contributed what knowledge, under which cultural context,
//! such that attribution can be verified later without re-disclosing the
//! knowledge itself. Contributions are addressed by a SHA-256 content
//! digest; an identical submission is rejected rather than silently
//! recorded twice.
//!
//! ## Security Invariant
//!
//! Content and attribution digests are immutable once recorded. The only
//! mutable fields of a [`Contribution`] are its `verified` flag (flips
//! once, via a proof the injected [`ProofVerifier`] accepts) and its
//! cumulative `compensation_amount` (monotone non-decreasing).
//!
//! [`ProofVerifier`]: equipath_zkp::ProofVerifier

pub mod contribution;
pub mod error;
pub mod ledger;

pub use contribution::{Contribution, ContributionSubmission};
pub use error::LedgerError;
pub use ledger::AttributionLedger;
