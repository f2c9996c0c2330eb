//! # Monetary Amounts
//!
//! Defines [`Amount`], a validated non-negative real value used for
//! compensation accounting and benefit-sharing arithmetic.
//!
//! ## Representation
//!
//! Compensation math in EquiPath is real-valued: royalty percentages,
//! community-fund splits, and fractional voting weights all multiply out
//! to non-integer results. `Amount` wraps an `f64` but confines it to a
//! validated domain — finite and non-negative — at every construction
//! site. No digest is ever computed over an amount, so the value never
//! participates in canonical byte production.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A finite, non-negative monetary amount.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Amount(f64);

impl Amount {
    /// Zero, the additive identity.
    pub const ZERO: Amount = Amount(0.0);

    /// Create an amount from a raw value.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidAmount`] if the value is negative,
    /// NaN, or infinite.
    pub fn new(value: f64) -> Result<Self, CoreError> {
        if !value.is_finite() || value < 0.0 {
            return Err(CoreError::InvalidAmount(value));
        }
        Ok(Self(value))
    }

    /// The underlying value.
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Whether this amount is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }

    /// Sum of two amounts, saturating at `f64::MAX`. The sum of two
    /// finite non-negative values cannot be negative or NaN, but it can
    /// overflow to infinity; saturation keeps the result in the valid
    /// domain.
    pub fn add(&self, other: Amount) -> Amount {
        let sum = self.0 + other.0;
        if sum.is_finite() {
            Amount(sum)
        } else {
            Amount(f64::MAX)
        }
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = f64::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative() {
        assert!(Amount::new(-0.01).is_err());
    }

    #[test]
    fn rejects_nan_and_infinity() {
        assert!(Amount::new(f64::NAN).is_err());
        assert!(Amount::new(f64::INFINITY).is_err());
    }

    #[test]
    fn accepts_zero_and_positive() {
        assert!(Amount::new(0.0).unwrap().is_zero());
        assert_eq!(Amount::new(125_000.50).unwrap().value(), 125_000.50);
    }

    #[test]
    fn add_accumulates() {
        let total = Amount::new(10.0).unwrap().add(Amount::new(2.5).unwrap());
        assert_eq!(total.value(), 12.5);
    }

    #[test]
    fn add_saturates_instead_of_overflowing() {
        let huge = Amount::new(f64::MAX).unwrap();
        let total = huge.add(huge);
        assert!(total.value().is_finite());
        assert_eq!(total.value(), f64::MAX);
    }

    #[test]
    fn deserialize_rejects_negative() {
        let result: Result<Amount, _> = serde_json::from_str("-5.0");
        assert!(result.is_err());
    }

    #[test]
    fn display_two_decimal_places() {
        assert_eq!(Amount::new(1234.5).unwrap().to_string(), "1234.50");
    }
}
