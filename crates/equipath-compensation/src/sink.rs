//! # Payment Sinks
//!
//! [`PaymentSink`] is the boundary between the compensation engine and
//! whatever actually moves money — a mobile-money API, a bank rail, a
//! token transfer. The engine calls the sink outside its own locks, so a
//! slow backend stalls only the payment in flight, never read paths.
//!
//! [`RecordingSink`] is the in-memory reference backend: it credits a
//! balance per recipient and logs each transfer, which is all the
//! integration tests and demos need. [`FailingSink`] fails every
//! transfer, for exercising the failure path.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use equipath_core::{Amount, PartyId};

use crate::error::PaymentBackendError;

/// An opaque backend transaction reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionRef(pub String);

impl std::fmt::Display for TransactionRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strategy trait for money movement.
///
/// Implementations must be synchronous and infallible in bookkeeping:
/// either the transfer settles and a [`TransactionRef`] comes back, or
/// it fails with [`PaymentBackendError`] and no money moved.
pub trait PaymentSink: Send + Sync {
    /// Transfer `amount` to `recipient` via the tagged method.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentBackendError`] if the transfer did not settle.
    fn send(
        &self,
        recipient: &PartyId,
        amount: Amount,
        method: &str,
    ) -> Result<TransactionRef, PaymentBackendError>;
}

/// One transfer settled by a [`RecordingSink`].
#[derive(Debug, Clone, PartialEq)]
pub struct SettledTransfer {
    /// The paid party.
    pub recipient: PartyId,
    /// The amount moved.
    pub amount: Amount,
    /// The method tag the engine passed.
    pub method: String,
    /// The reference handed back to the engine.
    pub reference: TransactionRef,
}

#[derive(Default)]
struct RecordingState {
    balances: BTreeMap<PartyId, Amount>,
    log: Vec<SettledTransfer>,
    next_reference: u64,
}

/// In-memory reference backend: settles every transfer, crediting a
/// per-recipient balance and appending to a transfer log.
#[derive(Default, Clone)]
pub struct RecordingSink {
    state: Arc<Mutex<RecordingState>>,
}

impl RecordingSink {
    /// Create a sink with empty balances.
    pub fn new() -> Self {
        Self::default()
    }

    /// The settled balance of a recipient.
    pub fn balance(&self, recipient: &PartyId) -> Amount {
        self.state
            .lock()
            .balances
            .get(recipient)
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// All settled transfers, in settlement order.
    pub fn transfers(&self) -> Vec<SettledTransfer> {
        self.state.lock().log.clone()
    }
}

impl PaymentSink for RecordingSink {
    fn send(
        &self,
        recipient: &PartyId,
        amount: Amount,
        method: &str,
    ) -> Result<TransactionRef, PaymentBackendError> {
        let mut state = self.state.lock();
        let reference = TransactionRef(format!("txn-{:08}", state.next_reference));
        state.next_reference += 1;

        let balance = state
            .balances
            .entry(recipient.clone())
            .or_insert(Amount::ZERO);
        *balance = balance.add(amount);
        state.log.push(SettledTransfer {
            recipient: recipient.clone(),
            amount,
            method: method.to_string(),
            reference: reference.clone(),
        });
        debug!(%recipient, %amount, method, %reference, "transfer settled");
        Ok(reference)
    }
}

/// Test double that fails every transfer with the configured message.
pub struct FailingSink {
    message: String,
}

impl FailingSink {
    /// Create a sink failing with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl PaymentSink for FailingSink {
    fn send(
        &self,
        _recipient: &PartyId,
        _amount: Amount,
        _method: &str,
    ) -> Result<TransactionRef, PaymentBackendError> {
        Err(PaymentBackendError(self.message.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn party(s: &str) -> PartyId {
        PartyId::new(s).unwrap()
    }

    #[test]
    fn recording_sink_credits_balances() {
        let sink = RecordingSink::new();
        sink.send(&party("ayana"), Amount::new(10.0).unwrap(), "mobile_money")
            .unwrap();
        sink.send(&party("ayana"), Amount::new(2.5).unwrap(), "mobile_money")
            .unwrap();
        assert_eq!(sink.balance(&party("ayana")).value(), 12.5);
        assert!(sink.balance(&party("tano")).is_zero());
        assert_eq!(sink.transfers().len(), 2);
    }

    #[test]
    fn references_are_unique_per_transfer() {
        let sink = RecordingSink::new();
        let a = sink
            .send(&party("a"), Amount::new(1.0).unwrap(), "m")
            .unwrap();
        let b = sink
            .send(&party("a"), Amount::new(1.0).unwrap(), "m")
            .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn failing_sink_carries_its_message() {
        let sink = FailingSink::new("rail unavailable");
        let err = sink
            .send(&party("a"), Amount::new(1.0).unwrap(), "m")
            .unwrap_err();
        assert!(err.to_string().contains("rail unavailable"));
    }
}
