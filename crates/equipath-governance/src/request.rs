//! # Access Requests, Ballots, and Tally Outcomes
//!
//! An [`AccessRequest`] is an external party's petition to access
//! protected knowledge. Its [`ConsentStatus`] moves through the state
//! machine:
//!
//! ```text
//! Pending ──tally: threshold met──▶ Approved ──revoke_access()──▶ Revoked
//!    │
//!    └──tally: threshold missed (or all abstain)──▶ Denied
//! ```
//!
//! `Denied` and `Revoked` are terminal. `Approved` admits exactly one
//! further transition — revocation — because consent remains revocable
//! after it is given.
//!
//! ## Design Choice: Validated Enum over Typestate
//!
//! Statuses are runtime-validated enum values rather than typestate
//! parameters: requests are stored in shared maps, persisted, and decided
//! by data-dependent tally arithmetic, so the status is not knowable at
//! compile time. Every transition site matches exhaustively on the enum.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use equipath_core::{PartyId, RequestId, Timestamp};

// ── Access Level ───────────────────────────────────────────────────────

/// How much of a knowledge item a requester is asking to see.
///
/// Levels are totally ordered: `None < BasicInfo < ResearchAccess <
/// FullAccess`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    /// No access.
    None,
    /// Existence and summary information only.
    BasicInfo,
    /// Access sufficient for research collaboration.
    ResearchAccess,
    /// Unrestricted access to the knowledge item.
    FullAccess,
}

impl AccessLevel {
    /// All levels in ascending order.
    pub fn all() -> &'static [AccessLevel] {
        &[
            Self::None,
            Self::BasicInfo,
            Self::ResearchAccess,
            Self::FullAccess,
        ]
    }

    /// The canonical string name of this level.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::BasicInfo => "basic_info",
            Self::ResearchAccess => "research_access",
            Self::FullAccess => "full_access",
        }
    }
}

impl std::fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ── Consent Status ─────────────────────────────────────────────────────

/// The lifecycle state of an access request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsentStatus {
    /// Deliberation in progress; votes are being collected.
    Pending,
    /// The community approved the request.
    Approved,
    /// The community denied the request. Terminal state.
    Denied,
    /// A previously granted approval was withdrawn. Terminal state.
    Revoked,
}

impl ConsentStatus {
    /// The canonical string name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Denied => "denied",
            Self::Revoked => "revoked",
        }
    }

    /// Whether the request has left `Pending`.
    pub fn is_decided(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Whether no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Denied | Self::Revoked)
    }

    /// Valid target states from this state.
    pub fn valid_transitions(&self) -> &'static [ConsentStatus] {
        match self {
            Self::Pending => &[Self::Approved, Self::Denied],
            Self::Approved => &[Self::Revoked],
            Self::Denied | Self::Revoked => &[],
        }
    }
}

impl std::fmt::Display for ConsentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ── Votes ──────────────────────────────────────────────────────────────

/// A member's choice on an access request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteChoice {
    /// In favour of granting access.
    Approve,
    /// Against granting access.
    Deny,
    /// Participates in quorum without taking a side.
    Abstain,
}

impl VoteChoice {
    /// The canonical string name of this choice.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Deny => "deny",
            Self::Abstain => "abstain",
        }
    }
}

impl std::fmt::Display for VoteChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One member's recorded ballot on one request.
///
/// The weight is captured at cast time. Later changes to the member's
/// weight or active flag never alter a recorded ballot, which is what
/// keeps settled decisions immutable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallotEntry {
    /// The choice cast.
    pub choice: VoteChoice,
    /// The member's voting weight at the moment the ballot was cast.
    pub weight: f64,
    /// When the ballot was cast.
    pub cast_at: Timestamp,
}

// ── Tally Outcome ──────────────────────────────────────────────────────

/// Result of tallying a request.
///
/// `Undecided` is a valid resting state, not an error: the vote simply
/// has not reached quorum yet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TallyOutcome {
    /// Quorum has not been reached; no state change occurred.
    Undecided {
        /// Weight of ballots cast so far (including abstentions).
        cast_weight: f64,
        /// Weight required for quorum under the current active membership.
        required_weight: f64,
    },
    /// The request has been decided (now, or in an earlier tally).
    Decided(ConsentStatus),
}

impl TallyOutcome {
    /// Whether the tally produced (or found) a decision.
    pub fn is_decided(&self) -> bool {
        matches!(self, Self::Decided(_))
    }
}

// ── Access Request ─────────────────────────────────────────────────────

/// A request for access to protected knowledge, under community
/// deliberation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessRequest {
    /// Request identifier.
    pub id: RequestId,
    /// The external party asking for access.
    pub requester: PartyId,
    /// The requester's organization.
    pub organization: String,
    /// Knowledge categories the request covers.
    pub categories: BTreeSet<String>,
    /// What the requester intends to do with the knowledge.
    pub intended_use: String,
    /// The research purpose, as stated to the community.
    pub research_purpose: String,
    /// The benefit-sharing terms proposed to the community.
    pub benefit_sharing_proposal: String,
    /// The access level requested.
    pub level: AccessLevel,
    /// Current lifecycle state.
    pub status: ConsentStatus,
    /// When the request was submitted.
    pub created_at: Timestamp,
    /// Approve weight recorded at decision time (zero while pending).
    pub approve_weight: f64,
    /// Deny weight recorded at decision time (zero while pending).
    pub deny_weight: f64,
    /// Append-only deliberation comment log, `"{name}: {comment}"`.
    pub comments: Vec<String>,
}

impl AccessRequest {
    /// Create a pending request with empty tallies.
    pub fn new(
        id: RequestId,
        requester: PartyId,
        organization: impl Into<String>,
        categories: BTreeSet<String>,
        level: AccessLevel,
    ) -> Self {
        Self {
            id,
            requester,
            organization: organization.into(),
            categories,
            intended_use: String::new(),
            research_purpose: String::new(),
            benefit_sharing_proposal: String::new(),
            level,
            status: ConsentStatus::Pending,
            created_at: Timestamp::now(),
            approve_weight: 0.0,
            deny_weight: 0.0,
            comments: Vec::new(),
        }
    }

    /// Set the purpose fields, builder-style.
    pub fn with_purpose(
        mut self,
        intended_use: impl Into<String>,
        research_purpose: impl Into<String>,
        benefit_sharing_proposal: impl Into<String>,
    ) -> Self {
        self.intended_use = intended_use.into();
        self.research_purpose = research_purpose.into();
        self.benefit_sharing_proposal = benefit_sharing_proposal.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_levels_are_ordered() {
        assert!(AccessLevel::None < AccessLevel::BasicInfo);
        assert!(AccessLevel::BasicInfo < AccessLevel::ResearchAccess);
        assert!(AccessLevel::ResearchAccess < AccessLevel::FullAccess);
    }

    #[test]
    fn pending_is_not_decided() {
        assert!(!ConsentStatus::Pending.is_decided());
        assert!(ConsentStatus::Approved.is_decided());
    }

    #[test]
    fn approved_is_decided_but_not_terminal() {
        assert!(!ConsentStatus::Approved.is_terminal());
        assert_eq!(
            ConsentStatus::Approved.valid_transitions(),
            &[ConsentStatus::Revoked]
        );
    }

    #[test]
    fn denied_and_revoked_are_terminal() {
        assert!(ConsentStatus::Denied.is_terminal());
        assert!(ConsentStatus::Revoked.is_terminal());
        assert!(ConsentStatus::Denied.valid_transitions().is_empty());
    }

    #[test]
    fn new_request_starts_pending_with_empty_tallies() {
        let request = AccessRequest::new(
            RequestId::new(),
            PartyId::new("univ-lab").unwrap(),
            "University Lab",
            BTreeSet::from(["medicinal_plants".to_string()]),
            AccessLevel::ResearchAccess,
        );
        assert_eq!(request.status, ConsentStatus::Pending);
        assert_eq!(request.approve_weight, 0.0);
        assert_eq!(request.deny_weight, 0.0);
        assert!(request.comments.is_empty());
    }

    #[test]
    fn status_serde_uses_snake_case() {
        let json = serde_json::to_string(&ConsentStatus::Approved).unwrap();
        assert_eq!(json, "\"approved\"");
    }
}
