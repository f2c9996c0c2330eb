//! # The Consent Governance Engine
//!
//! [`ConsentGovernance`] owns members, access requests, ballots, and
//! knowledge items, and drives the consent state machine:
//!
//! 1. An external party submits an [`AccessRequest`].
//! 2. Active members cast weighted ballots; re-voting overwrites a
//!    member's prior ballot while the request is `Pending`.
//! 3. [`tally`](ConsentGovernance::tally) is undecided until the cast
//!    weight reaches the quorum fraction of total active weight; once
//!    quorum is met, the approval threshold over decisive (non-abstain)
//!    weight decides the request. All-abstain at quorum is a denial.
//! 4. On approval, [`grant_access`](ConsentGovernance::grant_access)
//!    authorizes the requester on every knowledge item in the requested
//!    categories.
//! 5. [`revoke_access`](ConsentGovernance::revoke_access) withdraws those
//!    authorizations at any later time, unconditionally.
//!
//! ## Concurrency
//!
//! One `parking_lot::RwLock` guards the whole governance state. Vote
//! recording and tally therefore serialize: concurrent ballots from
//! different members cannot lose an update, and a tally never observes a
//! torn ballot set. All critical sections are short and computational.
//!
//! ## Decision Immutability
//!
//! Ballots capture the member's weight at cast time, and a tally on a
//! request that has left `Pending` returns the recorded decision without
//! recomputation. Membership changes after a decision — new members,
//! deactivations, weight edits — never alter it.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info, warn};

use equipath_core::{KnowledgeId, MemberId, PartyId, RequestId, Timestamp};
use equipath_store::KeyValueStore;

use crate::error::GovernanceError;
use crate::knowledge::{AccessEvent, KnowledgeItem};
use crate::member::Member;
use crate::request::{AccessRequest, BallotEntry, ConsentStatus, TallyOutcome, VoteChoice};

// ── Configuration ──────────────────────────────────────────────────────

/// Governance parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, serde::Deserialize)]
pub struct GovernanceConfig {
    /// Fraction of total active voting weight that must participate
    /// before a request can be decided.
    pub quorum_fraction: f64,
    /// Fraction of decisive (non-abstain) weight that must approve.
    pub approval_threshold: f64,
    /// Advisory deliberation window, in days. The engine does not expire
    /// requests on its own; the integrator's scheduler closes stale votes.
    pub voting_period_days: u32,
}

impl GovernanceConfig {
    /// Create a config, validating both fractions.
    ///
    /// # Errors
    ///
    /// Returns [`GovernanceError::InvalidConfig`] if either fraction lies
    /// outside `(0, 1]`.
    pub fn new(
        quorum_fraction: f64,
        approval_threshold: f64,
        voting_period_days: u32,
    ) -> Result<Self, GovernanceError> {
        for (name, value) in [
            ("quorum_fraction", quorum_fraction),
            ("approval_threshold", approval_threshold),
        ] {
            if !value.is_finite() || value <= 0.0 || value > 1.0 {
                return Err(GovernanceError::InvalidConfig(format!(
                    "{name} must be in (0, 1], got {value}"
                )));
            }
        }
        Ok(Self {
            quorum_fraction,
            approval_threshold,
            voting_period_days,
        })
    }
}

impl Default for GovernanceConfig {
    /// 60% quorum, 66% approval threshold, 14-day deliberation window.
    fn default() -> Self {
        Self {
            quorum_fraction: 0.60,
            approval_threshold: 0.66,
            voting_period_days: 14,
        }
    }
}

// ── Engine ─────────────────────────────────────────────────────────────

#[derive(Default)]
struct GovernanceState {
    members: BTreeMap<MemberId, Member>,
    requests: BTreeMap<RequestId, AccessRequest>,
    ballots: BTreeMap<RequestId, BTreeMap<MemberId, BallotEntry>>,
    knowledge: BTreeMap<KnowledgeId, KnowledgeItem>,
}

/// The consent governance state machine. See the module documentation
/// for the lifecycle it drives.
pub struct ConsentGovernance {
    community_name: String,
    config: GovernanceConfig,
    store: Arc<dyn KeyValueStore>,
    state: RwLock<GovernanceState>,
}

impl ConsentGovernance {
    /// Create an engine for the named community with default parameters.
    pub fn new(community_name: impl Into<String>, store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_config(community_name, GovernanceConfig::default(), store)
    }

    /// Create an engine with explicit governance parameters.
    pub fn with_config(
        community_name: impl Into<String>,
        config: GovernanceConfig,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            community_name: community_name.into(),
            config,
            store,
            state: RwLock::new(GovernanceState::default()),
        }
    }

    /// The community this engine governs for.
    pub fn community_name(&self) -> &str {
        &self.community_name
    }

    /// The governance parameters in effect.
    pub fn config(&self) -> &GovernanceConfig {
        &self.config
    }

    // ── Members ────────────────────────────────────────────────────

    /// Register a member, replacing any existing profile under the same
    /// id. Replacement is safe for settled decisions because ballots
    /// capture weight at cast time.
    pub fn add_member(&self, member: Member) {
        let mut state = self.state.write();
        self.persist(format!("member/{}", member.id), &member);
        debug!(member = %member.id, weight = member.voting_weight, "member registered");
        state.members.insert(member.id.clone(), member);
    }

    /// Deactivate a member. Their recorded ballots stand; they may not
    /// cast new ones and they leave the quorum denominator.
    ///
    /// # Errors
    ///
    /// Returns [`GovernanceError::UnknownMember`] if no such member.
    pub fn deactivate_member(&self, id: &MemberId) -> Result<(), GovernanceError> {
        let mut state = self.state.write();
        let member = state
            .members
            .get_mut(id)
            .ok_or_else(|| GovernanceError::UnknownMember(id.clone()))?;
        member.active = false;
        let snapshot = member.clone();
        self.persist(format!("member/{id}"), &snapshot);
        info!(member = %id, "member deactivated");
        Ok(())
    }

    /// Look up a member.
    pub fn member(&self, id: &MemberId) -> Option<Member> {
        self.state.read().members.get(id).cloned()
    }

    /// All registered members.
    pub fn members(&self) -> Vec<Member> {
        self.state.read().members.values().cloned().collect()
    }

    // ── Knowledge items ────────────────────────────────────────────

    /// Register a knowledge item, replacing any existing item under the
    /// same id.
    pub fn register_knowledge_item(&self, item: KnowledgeItem) {
        let mut state = self.state.write();
        self.persist(format!("knowledge/{}", item.id.as_uuid()), &item);
        debug!(item = %item.id, category = %item.category, "knowledge item registered");
        state.knowledge.insert(item.id, item);
    }

    /// Look up a knowledge item.
    pub fn knowledge_item(&self, id: &KnowledgeId) -> Option<KnowledgeItem> {
        self.state.read().knowledge.get(id).cloned()
    }

    /// All registered knowledge items.
    pub fn knowledge_items(&self) -> Vec<KnowledgeItem> {
        self.state.read().knowledge.values().cloned().collect()
    }

    // ── Requests and votes ─────────────────────────────────────────

    /// Submit an access request for deliberation.
    ///
    /// # Errors
    ///
    /// Returns [`GovernanceError::DuplicateRequest`] if the identifier is
    /// already in use.
    pub fn submit_request(&self, request: AccessRequest) -> Result<RequestId, GovernanceError> {
        let mut state = self.state.write();
        if state.requests.contains_key(&request.id) {
            return Err(GovernanceError::DuplicateRequest(request.id));
        }
        let id = request.id;
        self.persist(format!("request/{}", id.as_uuid()), &request);
        info!(request = %id, requester = %request.requester, "access request submitted");
        state.ballots.insert(id, BTreeMap::new());
        state.requests.insert(id, request);
        Ok(id)
    }

    /// Cast (or replace) a member's ballot on a pending request.
    ///
    /// The ballot captures the member's current weight. An optional
    /// comment is appended to the request's deliberation log as
    /// `"{display_name}: {comment}"`.
    ///
    /// # Errors
    ///
    /// Returns [`GovernanceError::UnknownRequest`],
    /// [`GovernanceError::UnknownMember`],
    /// [`GovernanceError::InactiveMember`], or
    /// [`GovernanceError::VotingClosed`] if the request has left
    /// `Pending`.
    pub fn cast_vote(
        &self,
        request_id: &RequestId,
        member_id: &MemberId,
        choice: VoteChoice,
        comment: Option<&str>,
    ) -> Result<(), GovernanceError> {
        let mut state = self.state.write();

        let (weight, display_name) = {
            let member = state
                .members
                .get(member_id)
                .ok_or_else(|| GovernanceError::UnknownMember(member_id.clone()))?;
            if !member.active {
                return Err(GovernanceError::InactiveMember(member_id.clone()));
            }
            (member.voting_weight, member.display_name.clone())
        };

        let request = state
            .requests
            .get_mut(request_id)
            .ok_or(GovernanceError::UnknownRequest(*request_id))?;
        if request.status != ConsentStatus::Pending {
            return Err(GovernanceError::VotingClosed {
                request: *request_id,
                status: request.status,
            });
        }

        if let Some(comment) = comment.filter(|c| !c.is_empty()) {
            request.comments.push(format!("{display_name}: {comment}"));
        }
        let request_snapshot = request.clone();

        let ballot = BallotEntry {
            choice,
            weight,
            cast_at: Timestamp::now(),
        };
        state
            .ballots
            .entry(*request_id)
            .or_default()
            .insert(member_id.clone(), ballot);

        self.persist(format!("request/{}", request_id.as_uuid()), &request_snapshot);
        self.persist(
            format!("ballot/{}/{member_id}", request_id.as_uuid()),
            &ballot,
        );
        debug!(request = %request_id, member = %member_id, choice = %choice, weight, "ballot recorded");
        Ok(())
    }

    /// Tally a request.
    ///
    /// Returns [`TallyOutcome::Undecided`] without any state change while
    /// the cast weight is below the quorum fraction of total active
    /// weight. Once quorum is met the decision is computed from the
    /// captured ballots and recorded on the request. A request that has
    /// already left `Pending` is returned as-is — recomputation never
    /// alters a settled decision.
    ///
    /// # Errors
    ///
    /// Returns [`GovernanceError::UnknownRequest`] if no such request.
    pub fn tally(&self, request_id: &RequestId) -> Result<TallyOutcome, GovernanceError> {
        let mut state = self.state.write();

        let status = state
            .requests
            .get(request_id)
            .ok_or(GovernanceError::UnknownRequest(*request_id))?
            .status;
        if status.is_decided() {
            return Ok(TallyOutcome::Decided(status));
        }

        let total_active_weight: f64 = state
            .members
            .values()
            .filter(|m| m.active)
            .map(|m| m.voting_weight)
            .sum();
        let required_weight = total_active_weight * self.config.quorum_fraction;

        let ballots = state.ballots.get(request_id);
        let cast_weight: f64 = ballots
            .map(|b| b.values().map(|entry| entry.weight).sum())
            .unwrap_or(0.0);

        if cast_weight < required_weight {
            return Ok(TallyOutcome::Undecided {
                cast_weight,
                required_weight,
            });
        }

        let (approve_weight, deny_weight) = ballots
            .map(|b| {
                b.values().fold((0.0, 0.0), |(a, d), entry| match entry.choice {
                    VoteChoice::Approve => (a + entry.weight, d),
                    VoteChoice::Deny => (a, d + entry.weight),
                    VoteChoice::Abstain => (a, d),
                })
            })
            .unwrap_or((0.0, 0.0));

        let decisive_weight = approve_weight + deny_weight;
        // All-abstain at quorum is an explicit denial, not a stalemate.
        let decision = if decisive_weight > 0.0
            && approve_weight / decisive_weight >= self.config.approval_threshold
        {
            ConsentStatus::Approved
        } else {
            ConsentStatus::Denied
        };

        let request = state
            .requests
            .get_mut(request_id)
            .ok_or(GovernanceError::UnknownRequest(*request_id))?;
        request.status = decision;
        request.approve_weight = approve_weight;
        request.deny_weight = deny_weight;
        let snapshot = request.clone();
        self.persist(format!("request/{}", request_id.as_uuid()), &snapshot);
        info!(
            request = %request_id,
            decision = %decision,
            approve_weight,
            deny_weight,
            cast_weight,
            "request decided"
        );
        Ok(TallyOutcome::Decided(decision))
    }

    /// Look up a request.
    pub fn request(&self, id: &RequestId) -> Option<AccessRequest> {
        self.state.read().requests.get(id).cloned()
    }

    /// All requests, in id order.
    pub fn requests(&self) -> Vec<AccessRequest> {
        self.state.read().requests.values().cloned().collect()
    }

    /// The recorded ballots for a request, if it exists.
    pub fn ballots(&self, id: &RequestId) -> Option<BTreeMap<MemberId, BallotEntry>> {
        self.state.read().ballots.get(id).cloned()
    }

    // ── Grant and revoke ───────────────────────────────────────────

    /// Grant the requester of an approved request access to every
    /// knowledge item in the request's categories.
    ///
    /// Idempotent per item: items already authorizing the requester are
    /// skipped without a duplicate history entry. Returns the ids of the
    /// items newly granted.
    ///
    /// # Errors
    ///
    /// Returns [`GovernanceError::UnknownRequest`] or
    /// [`GovernanceError::NotApproved`] if the request is not `Approved`.
    pub fn grant_access(&self, request_id: &RequestId) -> Result<Vec<KnowledgeId>, GovernanceError> {
        let mut state = self.state.write();

        let request = state
            .requests
            .get(request_id)
            .ok_or(GovernanceError::UnknownRequest(*request_id))?;
        if request.status != ConsentStatus::Approved {
            return Err(GovernanceError::NotApproved {
                request: *request_id,
                status: request.status,
            });
        }

        let requester = request.requester.clone();
        let organization = request.organization.clone();
        let categories = request.categories.clone();
        let level = request.level;
        let approve_weight = request.approve_weight;
        let deny_weight = request.deny_weight;

        let now = Timestamp::now();
        let mut granted = Vec::new();
        for item in state.knowledge.values_mut() {
            if !categories.contains(&item.category) || item.is_authorized(&requester) {
                continue;
            }
            item.authorized.insert(requester.clone());
            item.access_history.push(AccessEvent::Granted {
                requester: requester.clone(),
                organization: organization.clone(),
                level,
                approve_weight,
                deny_weight,
                at: now,
            });
            granted.push(item.id);
            let snapshot = item.clone();
            self.persist(format!("knowledge/{}", item.id.as_uuid()), &snapshot);
        }

        info!(
            request = %request_id,
            requester = %requester,
            items = granted.len(),
            "access granted"
        );
        Ok(granted)
    }

    /// Revoke a party's access across every knowledge item currently
    /// authorizing them, and mark their approved requests `Revoked`.
    ///
    /// Unconditional — revocation is not gated by a new vote — and
    /// idempotent: revoking a party with no authorizations is a no-op
    /// that appends nothing. Access history and ballots are never
    /// deleted. Returns the ids of the items whose authorization was
    /// withdrawn.
    pub fn revoke_access(&self, requester: &PartyId, reason: &str) -> Vec<KnowledgeId> {
        let mut state = self.state.write();

        let now = Timestamp::now();
        let mut revoked = Vec::new();
        for item in state.knowledge.values_mut() {
            if !item.is_authorized(requester) {
                continue;
            }
            item.authorized.remove(requester);
            item.access_history.push(AccessEvent::Revoked {
                requester: requester.clone(),
                reason: reason.to_string(),
                at: now,
            });
            revoked.push(item.id);
            let snapshot = item.clone();
            self.persist(format!("knowledge/{}", item.id.as_uuid()), &snapshot);
        }

        for request in state.requests.values_mut() {
            if request.requester == *requester && request.status == ConsentStatus::Approved {
                request.status = ConsentStatus::Revoked;
                let snapshot = request.clone();
                self.persist(format!("request/{}", request.id.as_uuid()), &snapshot);
            }
        }

        info!(requester = %requester, items = revoked.len(), reason, "access revoked");
        revoked
    }

    // ── Persistence ────────────────────────────────────────────────

    /// Write-behind persistence. The in-memory commit is authoritative;
    /// a store failure is logged and surfaced to the backend's own retry
    /// machinery, never used to roll back.
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
