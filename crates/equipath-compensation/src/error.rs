//! # Error Types — Compensation Failures
//!
//! A failed payment is not silent: [`pay`](crate::CompensationEngine::pay)
//! persists a `Failed` record *and* surfaces the error, so the audit
//! trail and the caller both see the failure. Failed amounts never reach
//! the ledger's compensation totals.

use equipath_core::AgreementId;
use equipath_ledger::LedgerError;
use thiserror::Error;

/// A payment backend rejected or failed a transfer.
#[derive(Error, Debug)]
#[error("payment backend failure: {0}")]
pub struct PaymentBackendError(pub String);

/// Errors raised by the compensation engine.
#[derive(Error, Debug)]
pub enum CompensationError {
    /// An agreement with this identifier already exists.
    #[error("duplicate agreement: {0}")]
    DuplicateAgreement(AgreementId),

    /// No agreement with this identifier exists.
    #[error("unknown agreement: {0}")]
    UnknownAgreement(AgreementId),

    /// The agreement exists but has been deactivated.
    #[error("agreement is not active: {0}")]
    InactiveAgreement(AgreementId),

    /// The attribution ledger rejected the compensation credit.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The payment sink failed the transfer.
    #[error(transparent)]
    Backend(#[from] PaymentBackendError),
}
