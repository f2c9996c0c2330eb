//! # The Compensation Engine
//!
//! [`CompensationEngine`] couples three things: benefit-sharing
//! agreements, the injected [`PaymentSink`], and the attribution ledger.
//! Every payment attempt becomes a [`CompensationRecord`]; a settled
//! payment additionally credits the compensated contribution in the
//! ledger, so the ledger's cumulative amount equals the sum of the
//! engine's `Completed` records for that contribution.
//!
//! ## Failure Accounting
//!
//! A sink failure, or a ledger rejection after the sink settled,
//! persists a `Failed` record and surfaces the cause. Failed amounts
//! never enter the ledger's compensation totals.
//!
//! ## Concurrency
//!
//! Payment id allocation and record insertion happen under the engine
//! lock; the sink call happens outside any lock, so a slow payment rail
//! stalls only the payment in flight.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use tracing::{info, warn};

use equipath_core::{AgreementId, Amount, ContributionId, PartyId, PaymentId, Timestamp};
use equipath_ledger::AttributionLedger;
use equipath_ledger::LedgerError;
use equipath_store::KeyValueStore;

use crate::agreement::BenefitSharingAgreement;
use crate::error::CompensationError;
use crate::record::{CompensationKind, CompensationRecord, PaymentStatus};
use crate::sink::{PaymentSink, TransactionRef};

/// Method tag for royalty contributor shares.
const METHOD_ROYALTY: &str = "royalty_distribution";
/// Method tag for royalty community-fund shares.
const METHOD_COMMUNITY_FUND: &str = "community_fund";
/// Method tag for milestone payouts.
const METHOD_MILESTONE: &str = "milestone_payout";

#[derive(Default)]
struct EngineState {
    agreements: BTreeMap<AgreementId, BenefitSharingAgreement>,
    records: BTreeMap<PaymentId, CompensationRecord>,
    next_payment: u64,
}

/// Per-kind slice of the analytics summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KindBreakdown {
    /// Payment attempts of this kind, any status.
    pub count: usize,
    /// Sum of `Completed` amounts of this kind.
    pub completed_amount: Amount,
}

/// Summary of compensation activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompensationAnalytics {
    /// Payment attempts, any status.
    pub total_payments: usize,
    /// Sum of all `Completed` amounts.
    pub total_completed: Amount,
    /// Breakdown per compensation kind.
    pub by_kind: BTreeMap<CompensationKind, KindBreakdown>,
    /// Agreements currently active.
    pub active_agreements: usize,
}

/// The compensation engine. See the module documentation for the
/// coupling between records, sink, and ledger.
pub struct CompensationEngine {
    ledger: Arc<AttributionLedger>,
    sink: Arc<dyn PaymentSink>,
    store: Arc<dyn KeyValueStore>,
    state: RwLock<EngineState>,
}

impl CompensationEngine {
    /// Create an engine over the given ledger, sink, and persistence
    /// backend.
    pub fn new(
        ledger: Arc<AttributionLedger>,
        sink: Arc<dyn PaymentSink>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            ledger,
            sink,
            store,
            state: RwLock::new(EngineState::default()),
        }
    }

    // ── Agreements ─────────────────────────────────────────────────

    /// Register a benefit-sharing agreement.
    ///
    /// # Errors
    ///
    /// Returns [`CompensationError::DuplicateAgreement`] if the
    /// identifier is already in use.
    pub fn create_agreement(
        &self,
        agreement: BenefitSharingAgreement,
    ) -> Result<AgreementId, CompensationError> {
        let mut state = self.state.write();
        if state.agreements.contains_key(&agreement.id) {
            return Err(CompensationError::DuplicateAgreement(agreement.id));
        }
        let id = agreement.id;
        self.persist(format!("agreement/{}", id.as_uuid()), &agreement);
        info!(
            agreement = %id,
            organization = %agreement.researcher_organization,
            "benefit-sharing agreement created"
        );
        state.agreements.insert(id, agreement);
        Ok(id)
    }

    /// Deactivate an agreement; further distributions against it are
    /// rejected.
    ///
    /// # Errors
    ///
    /// Returns [`CompensationError::UnknownAgreement`] for a bad id.
    pub fn deactivate_agreement(&self, id: &AgreementId) -> Result<(), CompensationError> {
        let mut state = self.state.write();
        let agreement = state
            .agreements
            .get_mut(id)
            .ok_or(CompensationError::UnknownAgreement(*id))?;
        agreement.active = false;
        let snapshot = agreement.clone();
        self.persist(format!("agreement/{id}", id = id.as_uuid()), &snapshot);
        info!(agreement = %id, "agreement deactivated");
        Ok(())
    }

    /// Look up an agreement.
    pub fn agreement(&self, id: &AgreementId) -> Option<BenefitSharingAgreement> {
        self.state.read().agreements.get(id).cloned()
    }

    /// All registered agreements.
    pub fn agreements(&self) -> Vec<BenefitSharingAgreement> {
        self.state.read().agreements.values().cloned().collect()
    }

    // ── Payments ───────────────────────────────────────────────────

    /// Pay `amount` to `recipient` as compensation for a contribution.
    ///
    /// On sink success the ledger credit and the `Completed` record are
    /// one logical transaction: a ledger rejection (unknown or
    /// unverified contribution) downgrades the record to `Failed` and
    /// surfaces the cause. A sink failure likewise persists a `Failed`
    /// record. In both cases the failed amount never reaches the
    /// ledger's compensation totals.
    ///
    /// # Errors
    ///
    /// Returns [`CompensationError::Backend`] on sink failure or
    /// [`CompensationError::Ledger`] on ledger rejection; the `Failed`
    /// record's id is recoverable from
    /// [`history_for`](Self::history_for).
    pub fn pay(
        &self,
        contribution: &ContributionId,
        recipient: &PartyId,
        amount: Amount,
        kind: CompensationKind,
        cultural_context: &str,
        method: &str,
    ) -> Result<PaymentId, CompensationError> {
        let id = {
            let mut state = self.state.write();
            let id = PaymentId::from_sequence(state.next_payment);
            state.next_payment += 1;
            id
        };

        // Sink call outside the lock.
        let transaction = match self.sink.send(recipient, amount, method) {
            Ok(reference) => reference,
            Err(err) => {
                warn!(payment = %id, recipient = %recipient, %err, "payment failed at sink");
                self.insert_record(
                    id,
                    *contribution,
                    recipient,
                    amount,
                    kind,
                    method,
                    None,
                    PaymentStatus::Failed,
                    cultural_context,
                );
                return Err(err.into());
            }
        };

        if let Err(err) = self.ledger.record_compensation(contribution, amount) {
            warn!(payment = %id, contribution = %contribution, %err, "ledger rejected settled payment");
            self.insert_record(
                id,
                *contribution,
                recipient,
                amount,
                kind,
                method,
                Some(transaction),
                PaymentStatus::Failed,
                cultural_context,
            );
            return Err(err.into());
        }

        self.insert_record(
            id,
            *contribution,
            recipient,
            amount,
            kind,
            method,
            Some(transaction),
            PaymentStatus::Completed,
            cultural_context,
        );
        info!(payment = %id, contribution = %contribution, recipient = %recipient, %amount, %kind, "payment completed");
        Ok(id)
    }

    /// Distribute revenue-proportional royalties under an agreement.
    ///
    /// The royalty is `revenue × royalty% / 100`; the community fund
    /// takes `community-fund% / 100` of that, and the contribution's
    /// recorded contributor receives the remainder. Zero-valued legs
    /// are skipped. Returns the payment ids, contributor share first.
    ///
    /// # Errors
    ///
    /// Returns [`CompensationError::UnknownAgreement`],
    /// [`CompensationError::InactiveAgreement`],
    /// [`CompensationError::Ledger`] if the agreement's contribution is
    /// not in the ledger, or the first payment error encountered.
    pub fn distribute_royalty(
        &self,
        agreement_id: &AgreementId,
        total_revenue: Amount,
    ) -> Result<Vec<PaymentId>, CompensationError> {
        let agreement = self.active_agreement(agreement_id)?;
        let contribution = self
            .ledger
            .contribution(&agreement.contribution)
            .ok_or(CompensationError::Ledger(LedgerError::UnknownContribution(
                agreement.contribution,
            )))?;

        let royalty = total_revenue.value() * agreement.royalty_percent / 100.0;
        let community_share = royalty * agreement.community_fund_percent / 100.0;
        let contributor_share = royalty - community_share;

        let mut payments = Vec::new();
        if let Ok(share) = Amount::new(contributor_share) {
            if !share.is_zero() {
                payments.push(self.pay(
                    &agreement.contribution,
                    &contribution.contributor,
                    share,
                    CompensationKind::Royalty,
                    &contribution.cultural_context,
                    METHOD_ROYALTY,
                )?);
            }
        }
        if let Ok(share) = Amount::new(community_share) {
            if !share.is_zero() {
                payments.push(self.pay(
                    &agreement.contribution,
                    &agreement.community,
                    share,
                    CompensationKind::CommunityFund,
                    &contribution.cultural_context,
                    METHOD_COMMUNITY_FUND,
                )?);
            }
        }
        Ok(payments)
    }

    /// Pay out a named milestone under an agreement.
    ///
    /// Returns `Ok(None)` when the agreement has no milestone of that
    /// name — an unreached milestone is not an error. The payout goes to
    /// the agreement's community party.
    ///
    /// # Errors
    ///
    /// Returns [`CompensationError::UnknownAgreement`],
    /// [`CompensationError::InactiveAgreement`], or the payment error.
    pub fn distribute_milestone(
        &self,
        agreement_id: &AgreementId,
        milestone: &str,
    ) -> Result<Option<PaymentId>, CompensationError> {
        let agreement = self.active_agreement(agreement_id)?;
        let Some(amount) = agreement.milestones.get(milestone).copied() else {
            return Ok(None);
        };
        let contribution = self
            .ledger
            .contribution(&agreement.contribution)
            .ok_or(CompensationError::Ledger(LedgerError::UnknownContribution(
                agreement.contribution,
            )))?;

        let id = self.pay(
            &agreement.contribution,
            &agreement.community,
            amount,
            CompensationKind::Milestone,
            &contribution.cultural_context,
            METHOD_MILESTONE,
        )?;
        Ok(Some(id))
    }

    // ── Read projections ───────────────────────────────────────────

    /// Look up a payment record.
    pub fn record(&self, id: &PaymentId) -> Option<CompensationRecord> {
        self.state.read().records.get(id).cloned()
    }

    /// All payment records for a recipient, in id order.
    pub fn history_for(&self, recipient: &PartyId) -> Vec<CompensationRecord> {
        self.state
            .read()
            .records
            .values()
            .filter(|r| r.recipient == *recipient)
            .cloned()
            .collect()
    }

    /// Sum of a recipient's `Completed` payment amounts.
    pub fn total_compensation(&self, recipient: &PartyId) -> Amount {
        self.state
            .read()
            .records
            .values()
            .filter(|r| r.recipient == *recipient && r.status == PaymentStatus::Completed)
            .fold(Amount::ZERO, |acc, r| acc.add(r.amount))
    }

    /// Summarize compensation activity.
    pub fn analytics(&self) -> CompensationAnalytics {
        let state = self.state.read();
        let mut by_kind: BTreeMap<CompensationKind, KindBreakdown> = CompensationKind::all()
            .iter()
            .map(|kind| {
                (
                    *kind,
                    KindBreakdown {
                        count: 0,
                        completed_amount: Amount::ZERO,
                    },
                )
            })
            .collect();
        let mut total_completed = Amount::ZERO;

        for record in state.records.values() {
            let slot = by_kind.entry(record.kind).or_insert(KindBreakdown {
                count: 0,
                completed_amount: Amount::ZERO,
            });
            slot.count += 1;
            if record.status == PaymentStatus::Completed {
                slot.completed_amount = slot.completed_amount.add(record.amount);
                total_completed = total_completed.add(record.amount);
            }
        }

        CompensationAnalytics {
            total_payments: state.records.len(),
            total_completed,
            by_kind,
            active_agreements: state.agreements.values().filter(|a| a.active).count(),
        }
    }

    // ── Internals ──────────────────────────────────────────────────

    fn active_agreement(
        &self,
        id: &AgreementId,
    ) -> Result<BenefitSharingAgreement, CompensationError> {
        let state = self.state.read();
        let agreement = state
            .agreements
            .get(id)
            .ok_or(CompensationError::UnknownAgreement(*id))?;
        if !agreement.active {
            return Err(CompensationError::InactiveAgreement(*id));
        }
        Ok(agreement.clone())
    }

    #[allow(clippy::too_many_arguments)]
    fn insert_record(
        &self,
        id: PaymentId,
        contribution: ContributionId,
        recipient: &PartyId,
        amount: Amount,
        kind: CompensationKind,
        method: &str,
        transaction: Option<TransactionRef>,
        status: PaymentStatus,
        cultural_context: &str,
    ) {
        let record = CompensationRecord {
            id,
            contribution,
            recipient: recipient.clone(),
            amount,
            kind,
            method: method.to_string(),
            transaction,
            at: Timestamp::now(),
            status,
            cultural_context: cultural_context.to_string(),
        };
        let mut state = self.state.write();
        self.persist(format!("payment/{}", id.value()), &record);
        state.records.insert(id, record);
    }

    /// Write-behind persistence. The in-memory commit is authoritative;
    /// a store failure is logged, never used to roll back.
    fn persist<T: Serialize>(&self, key: String, value: &T) {
        match serde_json::to_vec(value) {
            Ok(bytes) => {
                if let Err(err) = self.store.put(&key, bytes) {
                    warn!(%key, %err, "write-behind persistence failed");
                }
            }
            Err(err) => warn!(%key, %err, "entity serialization failed"),
        }
    }
}
