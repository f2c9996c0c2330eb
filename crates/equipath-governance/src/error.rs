//! # Error Types — Governance Failures
//!
//! All governance errors are recoverable, caller-visible rejections. A
//! rejected operation leaves the governance state unchanged.
//!
//! A tally that has not yet reached quorum is *not* an error — it is the
//! [`TallyOutcome::Undecided`](crate::request::TallyOutcome) result.

use equipath_core::{MemberId, RequestId};
use thiserror::Error;

use crate::request::ConsentStatus;

/// Errors raised by the consent governance state machine.
#[derive(Error, Debug)]
pub enum GovernanceError {
    /// A request with this identifier has already been submitted.
    #[error("duplicate access request: {0}")]
    DuplicateRequest(RequestId),

    /// No request with this identifier exists.
    #[error("unknown access request: {0}")]
    UnknownRequest(RequestId),

    /// No member with this identifier exists.
    #[error("unknown member: {0}")]
    UnknownMember(MemberId),

    /// The member exists but is not active and may not vote.
    #[error("member is not active: {0}")]
    InactiveMember(MemberId),

    /// The request has left `Pending`; no further votes are accepted.
    #[error("voting closed for request {request}: status is {status}")]
    VotingClosed {
        /// The request whose voting period has ended.
        request: RequestId,
        /// The status that closed the vote.
        status: ConsentStatus,
    },

    /// Access can only be granted on an approved request.
    #[error("request {request} is not approved: status is {status}")]
    NotApproved {
        /// The request access was attempted on.
        request: RequestId,
        /// Its actual status.
        status: ConsentStatus,
    },

    /// A voting weight was negative, NaN, or infinite.
    #[error("invalid voting weight: {0}")]
    InvalidWeight(f64),

    /// A governance parameter was outside its valid range.
    #[error("invalid governance config: {0}")]
    InvalidConfig(String),
}
