//! # Error Types — Core Validation Failures
//!
//! Errors raised by the value-type constructors in this crate. All errors
//! use `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! Higher-level crates (governance, ledger, compensation) define their own
//! operation-level error enums and wrap these where a constructor failure
//! can surface through their APIs.

use thiserror::Error;

/// Validation errors from core value-type constructors.
#[derive(Error, Debug)]
pub enum CoreError {
    /// An identifier string was empty or otherwise malformed.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// A monetary amount was negative, NaN, or infinite.
    #[error("invalid amount: {0}")]
    InvalidAmount(f64),

    /// A hex digest string had the wrong length or non-hex characters.
    #[error("invalid digest encoding: {0}")]
    InvalidDigest(String),
}
