//! # equipath-core — Foundational Types for EquiPath
//!
//! This crate is the bedrock of the EquiPath workspace. It defines the
//! value types shared by the governance, ledger, and compensation crates.
//! Every other crate in the workspace depends on `equipath-core`; it
//! depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `MemberId`, `PartyId`,
//!    `RequestId`, `ContributionId`, `PaymentId` — all distinct types with
//!    validated constructors. No bare strings for identifiers.
//!
//! 2. **Content addressing through `ContentDigest`.** All hash computation
//!    flows through [`Sha256Accumulator`] with explicit field separators,
//!    producing a fixed 32-byte digest.
//!
//! 3. **UTC-only timestamps.** [`Timestamp`] enforces UTC with seconds
//!    precision so event logs order deterministically.
//!
//! 4. **Validated amounts.** [`Amount`] confines monetary values to
//!    finite, non-negative reals at construction time.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `equipath-*` crates (this is the leaf of the
//!   DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod amount;
pub mod digest;
pub mod error;
pub mod identity;
pub mod metadata;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use amount::Amount;
pub use digest::{ContentDigest, Sha256Accumulator, DIGEST_LEN};
pub use error::CoreError;
pub use identity::{
    AgreementId, ContributionId, KnowledgeId, MemberId, PartyId, PaymentId, RequestId,
};
pub use metadata::Metadata;
pub use temporal::Timestamp;
