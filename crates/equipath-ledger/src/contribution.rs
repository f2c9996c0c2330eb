//! # Contribution Records and Digest Derivation
//!
//! A [`ContributionSubmission`] is what a contributor hands the ledger;
//! a [`Contribution`] is what the ledger records. The two digest
//! derivations live here so every construction site computes them the
//! same way:
//!
//! ```text
//! content     = H(payload ‖ context ‖ salt)
//! attribution = H(contributor ‖ context ‖ content)
//! ```
//!
//! with fields separator-delimited by [`ContentDigest::compute`]. The
//! salt is a caller-supplied uniqueness component (typically a submission
//! timestamp): identical payload, context, and salt collide by design;
//! a differing salt yields a distinct content digest.

use serde::{Deserialize, Serialize};

use equipath_core::{Amount, ContentDigest, ContributionId, Metadata, PartyId, Timestamp};

/// A contributor's submission, before it is recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionSubmission {
    /// The knowledge payload being attributed. The ledger hashes it and
    /// does not retain it.
    pub payload: Vec<u8>,
    /// Cultural context tag the knowledge is shared under.
    pub cultural_context: String,
    /// The contributing party.
    pub contributor: PartyId,
    /// Caller-supplied uniqueness component, hashed into the content
    /// digest as little-endian bytes.
    pub salt: u64,
    /// Opaque metadata carried on the record.
    pub metadata: Metadata,
}

impl ContributionSubmission {
    /// Create a submission with empty metadata.
    pub fn new(
        payload: impl Into<Vec<u8>>,
        cultural_context: impl Into<String>,
        contributor: PartyId,
        salt: u64,
    ) -> Self {
        Self {
            payload: payload.into(),
            cultural_context: cultural_context.into(),
            contributor,
            salt,
            metadata: Metadata::new(),
        }
    }

    /// Attach metadata, builder-style.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Derive the content digest of this submission.
    pub fn content_digest(&self) -> ContentDigest {
        ContentDigest::compute(&[
            &self.payload,
            self.cultural_context.as_bytes(),
            &self.salt.to_le_bytes(),
        ])
    }
}

/// Derive the attribution digest binding a contributor to a content
/// digest under a cultural context.
pub fn attribution_digest(
    contributor: &PartyId,
    cultural_context: &str,
    content: &ContentDigest,
) -> ContentDigest {
    ContentDigest::compute(&[
        contributor.as_str().as_bytes(),
        cultural_context.as_bytes(),
        content.as_bytes(),
    ])
}

/// A recorded contribution.
///
/// The digests, contributor, context, and timestamp are immutable after
/// insert; only `verified` and `compensation_amount` change, and each
/// only in one direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    /// Ledger-allocated sequence identifier.
    pub id: ContributionId,
    /// Digest of payload, context, and salt.
    pub content_digest: ContentDigest,
    /// Digest binding the contributor to the content digest.
    pub attribution_digest: ContentDigest,
    /// The contributing party.
    pub contributor: PartyId,
    /// Cultural context tag.
    pub cultural_context: String,
    /// When the contribution was recorded.
    pub recorded_at: Timestamp,
    /// Whether an accepted proof backs this record.
    pub verified: bool,
    /// Cumulative compensation credited to this record.
    pub compensation_amount: Amount,
    /// Opaque metadata from the submission.
    pub metadata: Metadata,
}
