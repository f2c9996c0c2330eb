//! # The Attribution Ledger
//!
//! [`AttributionLedger`] owns the contribution records and enforces the
//! three ledger invariants:
//!
//! 1. **No duplicates.** The duplicate-digest check and the insert are
//!    one atomic unit under the write lock, so two concurrent identical
//!    submissions cannot both land.
//! 2. **Proof-gated verification.** A supplied proof is evaluated by the
//!    injected [`ProofVerifier`] before anything is committed; a rejected
//!    proof rejects the whole submission. A record inserted without a
//!    proof stays unverified until [`attach_proof`] succeeds.
//! 3. **Accumulating compensation.** Credits add to the record's running
//!    total, never overwrite it, and only verified records accept them.
//!
//! ## Concurrency
//!
//! One `parking_lot::RwLock` guards the contribution map, the
//! digest index, and the id sequence together. The verifier is called
//! inside the write lock on the record path; implementations with
//! unbounded latency should be wrapped in
//! [`DeadlineVerifier`](equipath_zkp::DeadlineVerifier) by the
//! integrator.
//!
//! [`attach_proof`]: AttributionLedger::attach_proof

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use equipath_core::{Amount, ContentDigest, ContributionId, PartyId, Timestamp};
use equipath_store::KeyValueStore;
use equipath_zkp::{ProofBundle, ProofVerifier};

use crate::contribution::{attribution_digest, Contribution, ContributionSubmission};
use crate::error::LedgerError;

#[derive(Default)]
struct LedgerState {
    contributions: BTreeMap<ContributionId, Contribution>,
    by_digest: BTreeMap<ContentDigest, ContributionId>,
    next_sequence: u64,
}

/// The content-addressed attribution ledger. See the module
/// documentation for the invariants it enforces.
pub struct AttributionLedger {
    verifier: Arc<dyn ProofVerifier>,
    store: Arc<dyn KeyValueStore>,
    state: RwLock<LedgerState>,
}

impl AttributionLedger {
    /// Create a ledger with the given proof gateway and persistence
    /// backend.
    pub fn new(verifier: Arc<dyn ProofVerifier>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            verifier,
            store,
            state: RwLock::new(LedgerState::default()),
        }
    }

    // ── Recording ──────────────────────────────────────────────────

    /// Record a contribution.
    ///
    /// With `proof` supplied, the gateway gates the insert: acceptance
    /// commits the record with `verified = true`, rejection commits
    /// nothing. Without a proof the record commits unverified, awaiting
    /// [`attach_proof`](Self::attach_proof).
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::DuplicateContribution`] if an identical
    /// content digest is already recorded, or
    /// [`LedgerError::ProofRejected`] if the supplied proof fails
    /// verification.
    pub fn record_contribution(
        &self,
        submission: ContributionSubmission,
        proof: Option<&ProofBundle>,
    ) -> Result<ContributionId, LedgerError> {
        let content = submission.content_digest();
        let mut state = self.state.write();

        if let Some(existing) = state.by_digest.get(&content) {
            return Err(LedgerError::DuplicateContribution {
                digest: content,
                existing: *existing,
            });
        }

        let verified = match proof {
            Some(proof) => {
                if !self
                    .verifier
                    .verify(content.as_bytes(), &submission.cultural_context, proof)
                {
                    return Err(LedgerError::ProofRejected {
                        context: submission.cultural_context,
                    });
                }
                true
            }
            None => false,
        };

        let id = ContributionId::from_sequence(state.next_sequence);
        state.next_sequence += 1;

        let contribution = Contribution {
            id,
            content_digest: content,
            attribution_digest: attribution_digest(
                &submission.contributor,
                &submission.cultural_context,
                &content,
            ),
            contributor: submission.contributor,
            cultural_context: submission.cultural_context,
            recorded_at: Timestamp::now(),
            verified,
            compensation_amount: Amount::ZERO,
            metadata: submission.metadata,
        };

        state.by_digest.insert(content, id);
        self.persist(&contribution);
        info!(
            contribution = %id,
            contributor = %contribution.contributor,
            context = %contribution.cultural_context,
            verified,
            "contribution recorded"
        );
        state.contributions.insert(id, contribution);
        Ok(id)
    }

    /// Attach a proof to an unverified contribution, flipping it to
    /// verified on acceptance. Idempotent once verified.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownContribution`] for a bad id, or
    /// [`LedgerError::ProofRejected`] if the gateway rejects the proof —
    /// the record stays unverified.
    pub fn attach_proof(
        &self,
        id: &ContributionId,
        proof: &ProofBundle,
    ) -> Result<(), LedgerError> {
        let mut state = self.state.write();
        let contribution = state
            .contributions
            .get_mut(id)
            .ok_or(LedgerError::UnknownContribution(*id))?;

        if contribution.verified {
            return Ok(());
        }
        if !self.verifier.verify(
            contribution.content_digest.as_bytes(),
            &contribution.cultural_context,
            proof,
        ) {
            return Err(LedgerError::ProofRejected {
                context: contribution.cultural_context.clone(),
            });
        }

        contribution.verified = true;
        let snapshot = contribution.clone();
        self.persist(&snapshot);
        info!(contribution = %id, "proof accepted, contribution verified");
        Ok(())
    }

    /// Credit compensation to a verified contribution. The amount adds
    /// to the record's running total.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownContribution`] for a bad id or
    /// [`LedgerError::NotVerified`] if no accepted proof backs the
    /// record.
    pub fn record_compensation(
        &self,
        id: &ContributionId,
        amount: Amount,
    ) -> Result<Amount, LedgerError> {
        let mut state = self.state.write();
        let contribution = state
            .contributions
            .get_mut(id)
            .ok_or(LedgerError::UnknownContribution(*id))?;
        if !contribution.verified {
            return Err(LedgerError::NotVerified(*id));
        }

        contribution.compensation_amount = contribution.compensation_amount.add(amount);
        let total = contribution.compensation_amount;
        let snapshot = contribution.clone();
        self.persist(&snapshot);
        debug!(contribution = %id, credited = %amount, total = %total, "compensation credited");
        Ok(total)
    }

    // ── Verification ───────────────────────────────────────────────

    /// Check a contributor's claim over a recorded content digest by
    /// recomputing the attribution digest from the stored fields.
    ///
    /// Returns `false` for an unknown digest or a claimed contributor
    /// other than the recorded one.
    pub fn verify_attribution(
        &self,
        content_digest: &ContentDigest,
        claimed_contributor: &PartyId,
    ) -> bool {
        let state = self.state.read();
        let Some(id) = state.by_digest.get(content_digest) else {
            return false;
        };
        let Some(contribution) = state.contributions.get(id) else {
            return false;
        };
        let recomputed = attribution_digest(
            claimed_contributor,
            &contribution.cultural_context,
            content_digest,
        );
        recomputed == contribution.attribution_digest
    }

    // ── Read projections ───────────────────────────────────────────

    /// Look up a contribution by id.
    pub fn contribution(&self, id: &ContributionId) -> Option<Contribution> {
        self.state.read().contributions.get(id).cloned()
    }

    /// Look up a contribution by content digest.
    pub fn lookup_by_hash(&self, digest: &ContentDigest) -> Option<Contribution> {
        let state = self.state.read();
        let id = state.by_digest.get(digest)?;
        state.contributions.get(id).cloned()
    }

    /// All contributions recorded for a party, in id order.
    pub fn by_contributor(&self, party: &PartyId) -> Vec<Contribution> {
        self.state
            .read()
            .contributions
            .values()
            .filter(|c| c.contributor == *party)
            .cloned()
            .collect()
    }

    /// Total compensation credited across all of a party's
    /// contributions.
    pub fn total_compensation(&self, party: &PartyId) -> Amount {
        self.state
            .read()
            .contributions
            .values()
            .filter(|c| c.contributor == *party)
            .fold(Amount::ZERO, |acc, c| acc.add(c.compensation_amount))
    }

    /// Number of recorded contributions.
    pub fn len(&self) -> usize {
        self.state.read().contributions.len()
    }

    /// Whether the ledger is empty.
    pub fn is_empty(&self) -> bool {
        self.state.read().contributions.is_empty()
    }

    // ── Persistence ────────────────────────────────────────────────

    /// Write-behind persistence. The in-memory commit is authoritative;
    /// a store failure is logged, never used to roll back.
    fn persist(&self, contribution: &Contribution) {
        let key = format!("contribution/{}", contribution.id.value());
        match serde_json::to_vec(contribution) {
            Ok(bytes) => {
                if let Err(err) = self.store.put(&key, bytes) {
                    warn!(%key, %err, "write-behind persistence failed");
                }
            }
            Err(err) => warn!(%key, %err, "contribution serialization failed"),
        }
    }
}
