//! # Identity Newtypes
//!
//! Domain-primitive newtypes for identifiers throughout EquiPath. Each
//! identifier is a distinct type — you cannot pass a [`MemberId`] where a
//! [`PartyId`] is expected.
//!
//! ## Validation
//!
//! String-based identifiers ([`MemberId`], [`PartyId`]) are opaque,
//! pre-authenticated handles supplied by the integrator; they reject only
//! empty strings. UUID-based identifiers ([`RequestId`], [`KnowledgeId`],
//! [`AgreementId`]) are always valid by construction. Sequence-based
//! identifiers ([`ContributionId`], [`PaymentId`]) are allocated by the
//! owning store and never reused.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// Helper macro to implement `Deserialize` for string newtypes that must
/// validate their contents. Deserializes as a plain `String`, then routes
/// through the type's `new()` constructor so that invalid values are
/// rejected at deserialization time — not silently accepted.
macro_rules! impl_validating_deserialize {
    ($ty:ident) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

/// Helper macro for UUID-backed identifiers: constructor, accessor,
/// `Default`, `Display`, and `FromStr`.
macro_rules! uuid_id {
    ($(#[$doc:meta])* $ty:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $ty(Uuid);

        impl $ty {
            /// Create a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Create an identifier from an existing UUID.
            pub fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            /// Access the underlying UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $ty {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }

        impl std::str::FromStr for $ty {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::from_str(s).map(Self)
            }
        }
    };
}

/// Helper macro for store-allocated `u64` sequence identifiers.
macro_rules! sequence_id {
    ($(#[$doc:meta])* $ty:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $ty(u64);

        impl $ty {
            /// Wrap a sequence value allocated by the owning store.
            pub fn from_sequence(seq: u64) -> Self {
                Self(seq)
            }

            /// The underlying sequence value.
            pub fn value(&self) -> u64 {
                self.0
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// String-based identifiers (opaque, pre-authenticated)
// ---------------------------------------------------------------------------

/// Identifier of a community member with voting rights.
///
/// Opaque handle issued by the integrator's identity layer; EquiPath
/// performs no authentication of its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MemberId(String);

impl_validating_deserialize!(MemberId);

impl MemberId {
    /// Create a member identifier from a non-empty string.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidIdentifier`] if the string is empty.
    pub fn new(value: impl Into<String>) -> Result<Self, CoreError> {
        let s = value.into();
        if s.is_empty() {
            return Err(CoreError::InvalidIdentifier("empty member id".into()));
        }
        Ok(Self(s))
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an external party: a requester, contributor, payment
/// recipient, or community fund.
///
/// Parties are pre-authenticated by the integrator; within EquiPath a
/// `PartyId` is an opaque attribution and payout handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PartyId(String);

impl_validating_deserialize!(PartyId);

impl PartyId {
    /// Create a party identifier from a non-empty string.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidIdentifier`] if the string is empty.
    pub fn new(value: impl Into<String>) -> Result<Self, CoreError> {
        let s = value.into();
        if s.is_empty() {
            return Err(CoreError::InvalidIdentifier("empty party id".into()));
        }
        Ok(Self(s))
    }

    /// Access the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PartyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// UUID-based identifiers (always valid by construction)
// ---------------------------------------------------------------------------

uuid_id!(
    /// A unique identifier for an access request under deliberation.
    RequestId,
    "request"
);

uuid_id!(
    /// A unique identifier for a protected knowledge item.
    KnowledgeId,
    "knowledge"
);

uuid_id!(
    /// A unique identifier for a benefit-sharing agreement.
    AgreementId,
    "agreement"
);

// ---------------------------------------------------------------------------
// Sequence-based identifiers (allocated by the owning store)
// ---------------------------------------------------------------------------

sequence_id!(
    /// A monotonically assigned identifier for a ledger contribution.
    ///
    /// Allocated by the attribution ledger's internal sequence; never
    /// reused or reassigned.
    ContributionId,
    "contribution"
);

sequence_id!(
    /// A monotonically assigned identifier for a compensation payment.
    PaymentId,
    "payment"
);
