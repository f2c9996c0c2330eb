//! # Error Types — Ledger Failures
//!
//! Every ledger error is a caller-visible rejection that leaves the
//! ledger unchanged. In particular, a rejected proof never produces a
//! partially recorded contribution.

use equipath_core::{ContentDigest, ContributionId};
use thiserror::Error;

/// Errors raised by the attribution ledger.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// A contribution with an identical content digest is already
    /// recorded. Carries the id of the existing record.
    #[error("duplicate contribution: content digest {digest} already recorded as {existing}")]
    DuplicateContribution {
        /// The colliding content digest.
        digest: ContentDigest,
        /// The contribution already holding that digest.
        existing: ContributionId,
    },

    /// No contribution with this identifier exists.
    #[error("unknown contribution: {0}")]
    UnknownContribution(ContributionId),

    /// The proof verification gateway rejected the supplied proof.
    #[error("proof rejected for contribution under context {context:?}")]
    ProofRejected {
        /// The cultural context the proof was evaluated against.
        context: String,
    },

    /// The contribution has no accepted proof; compensation requires a
    /// verified record.
    #[error("contribution {0} is not verified")]
    NotVerified(ContributionId),
}
