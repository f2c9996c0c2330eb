//! Write-behind persistence fidelity: every engine commits in memory
//! first and snapshots entities into the key-value store under stable
//! key prefixes. The snapshots must deserialize back into entities that
//! match the in-memory state, and prefix scans must see exactly the
//! entities written.

use std::collections::BTreeSet;
use std::sync::Arc;

use equipath_core::{MemberId, PartyId, RequestId};
use equipath_governance::{
    AccessLevel, AccessRequest, BallotEntry, ConsentGovernance, ConsentStatus, Member, VoteChoice,
};
use equipath_ledger::{AttributionLedger, Contribution, ContributionSubmission};
use equipath_store::{KeyValueStore, MemoryStore};
use equipath_zkp::StructuralVerifier;

fn member_id(s: &str) -> MemberId {
    MemberId::new(s).unwrap()
}

fn party(s: &str) -> PartyId {
    PartyId::new(s).unwrap()
}

#[test]
fn governance_snapshots_deserialize_to_current_state() {
    let store = Arc::new(MemoryStore::new());
    let governance = ConsentGovernance::new("river-valley", store.clone());

    governance.add_member(Member::new(member_id("elder-amara"), "Amara", "elder", 3.0).unwrap());
    governance.add_member(Member::new(member_id("member-nia"), "Nia", "member", 1.0).unwrap());

    let request_id = governance
        .submit_request(AccessRequest::new(
            RequestId::new(),
            party("univ-research-lab"),
            "University Research Lab",
            BTreeSet::from(["medicinal_plants".to_string()]),
            AccessLevel::ResearchAccess,
        ))
        .unwrap();
    governance
        .cast_vote(&request_id, &member_id("elder-amara"), VoteChoice::Approve, None)
        .unwrap();
    governance
        .cast_vote(&request_id, &member_id("member-nia"), VoteChoice::Approve, None)
        .unwrap();
    governance.tally(&request_id).unwrap();

    // One snapshot per member, one per request, one per ballot.
    assert_eq!(store.scan_prefix("member/").unwrap().len(), 2);
    assert_eq!(store.scan_prefix("request/").unwrap().len(), 1);
    assert_eq!(store.scan_prefix("ballot/").unwrap().len(), 2);

    let raw = store
        .get(&format!("request/{}", request_id.as_uuid()))
        .unwrap()
        .expect("decided request must be snapshotted");
    let persisted: AccessRequest = serde_json::from_slice(&raw).unwrap();
    assert_eq!(persisted.status, ConsentStatus::Approved);
    assert_eq!(persisted, governance.request(&request_id).unwrap());

    for (_, bytes) in store.scan_prefix("ballot/").unwrap() {
        let ballot: BallotEntry = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(ballot.choice, VoteChoice::Approve);
    }
}

#[test]
fn ledger_snapshots_track_verification_and_credit() {
    let store = Arc::new(MemoryStore::new());
    let ledger = AttributionLedger::new(Arc::new(StructuralVerifier::new()), store.clone());

    let id = ledger
        .record_contribution(
            ContributionSubmission::new(
                b"willow bark decoction".to_vec(),
                "traditional_healing",
                party("healer-ayana"),
                1,
            ),
            None,
        )
        .unwrap();

    let key = format!("contribution/{}", id.value());
    let unverified: Contribution =
        serde_json::from_slice(&store.get(&key).unwrap().unwrap()).unwrap();
    assert!(!unverified.verified);

    ledger
        .attach_proof(
            &id,
            &equipath_zkp::ProofBundle {
                proof_a: vec![1; 32],
                proof_b: vec![2; 64],
                proof_c: vec![3; 32],
                public_signals: vec![4; 32],
            },
        )
        .unwrap();
    ledger
        .record_compensation(&id, equipath_core::Amount::new(42.0).unwrap())
        .unwrap();

    // The snapshot reflects the latest state transition.
    let current: Contribution =
        serde_json::from_slice(&store.get(&key).unwrap().unwrap()).unwrap();
    assert!(current.verified);
    assert_eq!(current.compensation_amount.value(), 42.0);
    assert_eq!(current, ledger.contribution(&id).unwrap());
}
