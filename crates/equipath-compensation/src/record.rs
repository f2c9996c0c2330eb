//! # Payment Records
//!
//! A [`CompensationRecord`] is the audit trail of one payment attempt.
//! Records are append-only: once written, only the status can change,
//! and only along the transitions [`PaymentStatus::valid_transitions`]
//! admits. Completed and Failed records are never deleted — a failed
//! payment is evidence, not noise.

use serde::{Deserialize, Serialize};

use equipath_core::{Amount, ContributionId, PartyId, PaymentId, Timestamp};

use crate::sink::TransactionRef;

/// Why a payment was made.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CompensationKind {
    /// One-off fee for research access.
    ResearchFee,
    /// Contributor share of revenue-proportional royalties.
    Royalty,
    /// Payout on reaching a named agreement milestone.
    Milestone,
    /// Community-fund share of a royalty distribution.
    CommunityFund,
}

impl CompensationKind {
    /// All kinds, in declaration order.
    pub fn all() -> &'static [CompensationKind] {
        &[
            Self::ResearchFee,
            Self::Royalty,
            Self::Milestone,
            Self::CommunityFund,
        ]
    }

    /// The canonical string name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ResearchFee => "research_fee",
            Self::Royalty => "royalty",
            Self::Milestone => "milestone",
            Self::CommunityFund => "community_fund",
        }
    }
}

impl std::fmt::Display for CompensationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle state of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Submitted to an asynchronous rail; settlement not yet known.
    Pending,
    /// The transfer settled. Terminal state.
    Completed,
    /// The transfer failed. Terminal state.
    Failed,
    /// Withdrawn before settlement. Terminal state.
    Cancelled,
}

impl PaymentStatus {
    /// The canonical string name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Valid target states from this state.
    pub fn valid_transitions(&self) -> &'static [PaymentStatus] {
        match self {
            Self::Pending => &[Self::Completed, Self::Failed, Self::Cancelled],
            Self::Completed | Self::Failed | Self::Cancelled => &[],
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One payment attempt, successful or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompensationRecord {
    /// Engine-allocated payment identifier.
    pub id: PaymentId,
    /// The contribution this payment compensates.
    pub contribution: ContributionId,
    /// The party paid.
    pub recipient: PartyId,
    /// The amount attempted.
    pub amount: Amount,
    /// Why the payment was made.
    pub kind: CompensationKind,
    /// Payment method tag, opaque to the engine (e.g. "mobile_money").
    pub method: String,
    /// Backend transaction reference; present only on settled transfers.
    pub transaction: Option<TransactionRef>,
    /// When the attempt was recorded.
    pub at: Timestamp,
    /// Settlement state.
    pub status: PaymentStatus,
    /// Cultural context of the compensated contribution.
    pub cultural_context: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_is_the_only_non_terminal_status() {
        assert!(!PaymentStatus::Pending.is_terminal());
        for status in [
            PaymentStatus::Completed,
            PaymentStatus::Failed,
            PaymentStatus::Cancelled,
        ] {
            assert!(status.is_terminal());
            assert!(status.valid_transitions().is_empty());
        }
    }

    #[test]
    fn kind_serde_uses_snake_case() {
        let json = serde_json::to_string(&CompensationKind::CommunityFund).unwrap();
        assert_eq!(json, "\"community_fund\"");
    }

    #[test]
    fn all_kinds_have_distinct_names() {
        let names: std::collections::BTreeSet<_> =
            CompensationKind::all().iter().map(|k| k.as_str()).collect();
        assert_eq!(names.len(), CompensationKind::all().len());
    }
}
