//! # equipath-compensation — Benefit-Sharing and Payment Records
//!
//! Turns benefit-sharing agreements into payments: one-off research
//! fees, revenue-proportional royalties split between contributor and
//! community fund, and milestone payouts. Every payment attempt leaves
//! an append-only [`CompensationRecord`]; successful payments also
//! credit the attribution ledger, so a contribution's cumulative
//! compensation and the sum of its completed records always agree.
//!
//! Actual money movement is behind the [`PaymentSink`] trait. The crate
//! ships [`RecordingSink`], an in-memory reference backend, and
//! [`FailingSink`], a test double for failure paths.

pub mod agreement;
pub mod engine;
pub mod error;
pub mod record;
pub mod sink;

pub use agreement::BenefitSharingAgreement;
pub use engine::{CompensationAnalytics, CompensationEngine, KindBreakdown};
pub use error::{CompensationError, PaymentBackendError};
pub use record::{CompensationKind, CompensationRecord, PaymentStatus};
pub use sink::{FailingSink, PaymentSink, RecordingSink, SettledTransfer, TransactionRef};
