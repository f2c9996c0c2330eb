//! # equipath-governance — Consent Governance State Machine
//!
//! Community-controlled consent over disclosure of protected knowledge:
//!
//! - **Error** ([`error`]): structured error hierarchy for the governance
//!   subsystem.
//!
//! - **Member** ([`member`]): community members with weighted voting
//!   rights.
//!
//! - **Request** ([`request`]): access requests and their consent status
//!   lifecycle `Pending → {Approved, Denied}`, `Approved → Revoked`, plus
//!   weighted ballots and tally outcomes.
//!
//! - **Knowledge** ([`knowledge`]): protected knowledge items with
//!   authorization sets and append-only access history.
//!
//! - **Engine** ([`engine`]): [`ConsentGovernance`], the serialized
//!   state machine that records votes, computes quorum/threshold tallies,
//!   and applies grant/revoke to knowledge items.
//!
//! Consent here is continuously revocable, not a one-time grant: an
//! approval can be withdrawn at any later time, and revocation rewrites
//! authorization sets prospectively while history stays append-only.

pub mod engine;
pub mod error;
pub mod knowledge;
pub mod member;
pub mod request;

// Re-export primary types for ergonomic imports.
pub use engine::{ConsentGovernance, GovernanceConfig};
pub use error::GovernanceError;
pub use knowledge::{AccessEvent, KnowledgeItem, Sensitivity};
pub use member::Member;
pub use request::{AccessLevel, AccessRequest, BallotEntry, ConsentStatus, TallyOutcome, VoteChoice};
