//! Conservation across the ledger/compensation boundary: a
//! contribution's cumulative compensation always equals the sum of the
//! engine's completed payment amounts for it. Failed payments appear in
//! the audit trail but never in either total.

use std::sync::Arc;

use equipath_compensation::{
    CompensationEngine, CompensationError, CompensationKind, FailingSink, PaymentStatus,
    RecordingSink,
};
use equipath_core::{Amount, PartyId};
use equipath_ledger::{AttributionLedger, ContributionSubmission, LedgerError};
use equipath_store::MemoryStore;
use equipath_zkp::{ProofBundle, StructuralVerifier};

fn party(s: &str) -> PartyId {
    PartyId::new(s).unwrap()
}

fn amount(v: f64) -> Amount {
    Amount::new(v).unwrap()
}

fn proof() -> ProofBundle {
    ProofBundle {
        proof_a: vec![1; 32],
        proof_b: vec![2; 64],
        proof_c: vec![3; 32],
        public_signals: vec![4; 32],
    }
}

fn verified_ledger() -> (Arc<AttributionLedger>, equipath_core::ContributionId) {
    let ledger = Arc::new(AttributionLedger::new(
        Arc::new(StructuralVerifier::new()),
        Arc::new(MemoryStore::new()),
    ));
    let id = ledger
        .record_contribution(
            ContributionSubmission::new(
                b"willow bark decoction".to_vec(),
                "traditional_healing",
                party("healer-ayana"),
                1,
            ),
            Some(&proof()),
        )
        .unwrap();
    (ledger, id)
}

#[test]
fn failed_sink_leaves_both_totals_untouched() {
    let (ledger, contribution) = verified_ledger();
    let engine = CompensationEngine::new(
        ledger.clone(),
        Arc::new(FailingSink::new("rail down")),
        Arc::new(MemoryStore::new()),
    );

    let result = engine.pay(
        &contribution,
        &party("healer-ayana"),
        amount(500.0),
        CompensationKind::ResearchFee,
        "traditional_healing",
        "mobile_money",
    );
    assert!(matches!(result, Err(CompensationError::Backend(_))));

    assert!(ledger
        .contribution(&contribution)
        .unwrap()
        .compensation_amount
        .is_zero());
    assert!(engine.total_compensation(&party("healer-ayana")).is_zero());

    let history = engine.history_for(&party("healer-ayana"));
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, PaymentStatus::Failed);
}

#[test]
fn unverified_contribution_cannot_be_compensated() {
    let ledger = Arc::new(AttributionLedger::new(
        Arc::new(StructuralVerifier::new()),
        Arc::new(MemoryStore::new()),
    ));
    let unverified = ledger
        .record_contribution(
            ContributionSubmission::new(
                b"awaiting proof".to_vec(),
                "traditional_healing",
                party("healer-ayana"),
                1,
            ),
            None,
        )
        .unwrap();
    let engine = CompensationEngine::new(
        ledger.clone(),
        Arc::new(RecordingSink::new()),
        Arc::new(MemoryStore::new()),
    );

    let result = engine.pay(
        &unverified,
        &party("healer-ayana"),
        amount(100.0),
        CompensationKind::ResearchFee,
        "traditional_healing",
        "mobile_money",
    );
    assert!(matches!(
        result,
        Err(CompensationError::Ledger(LedgerError::NotVerified(_)))
    ));
    assert!(ledger
        .contribution(&unverified)
        .unwrap()
        .compensation_amount
        .is_zero());

    // Once a proof is attached, payment goes through.
    ledger.attach_proof(&unverified, &proof()).unwrap();
    engine
        .pay(
            &unverified,
            &party("healer-ayana"),
            amount(100.0),
            CompensationKind::ResearchFee,
            "traditional_healing",
            "mobile_money",
        )
        .unwrap();
    assert_eq!(
        ledger
            .contribution(&unverified)
            .unwrap()
            .compensation_amount
            .value(),
        100.0
    );
}

#[test]
fn ledger_total_matches_completed_records_under_mixed_outcomes() {
    let (ledger, contribution) = verified_ledger();
    let sink = RecordingSink::new();
    let good = CompensationEngine::new(
        ledger.clone(),
        Arc::new(sink.clone()),
        Arc::new(MemoryStore::new()),
    );
    let bad = CompensationEngine::new(
        ledger.clone(),
        Arc::new(FailingSink::new("intermittent outage")),
        Arc::new(MemoryStore::new()),
    );

    let mut expected = 0.0;
    for (i, value) in [120.0, 75.5, 300.0, 42.25].iter().enumerate() {
        let failing_leg = i % 2 == 1;
        let engine = if failing_leg { &bad } else { &good };
        let result = engine.pay(
            &contribution,
            &party("healer-ayana"),
            amount(*value),
            CompensationKind::Royalty,
            "traditional_healing",
            "mobile_money",
        );
        if failing_leg {
            assert!(result.is_err());
        } else {
            result.unwrap();
            expected += value;
        }
    }

    assert_eq!(
        ledger
            .contribution(&contribution)
            .unwrap()
            .compensation_amount
            .value(),
        expected
    );
    assert_eq!(
        ledger.total_compensation(&party("healer-ayana")).value(),
        expected
    );
    assert_eq!(good.total_compensation(&party("healer-ayana")).value(), expected);
    assert_eq!(sink.balance(&party("healer-ayana")).value(), expected);
}
