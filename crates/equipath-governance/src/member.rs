//! # Community Members
//!
//! A [`Member`] holds weighted voting rights in the community's consent
//! process. Roles are free-form tags (elder, healer, community leader,
//! member); weight differences between roles are the community's own
//! policy, not the engine's.
//!
//! Ballots capture a member's weight at cast time, so editing or
//! deactivating a member later never rewrites a settled decision.

use serde::{Deserialize, Serialize};

use equipath_core::MemberId;

use crate::error::GovernanceError;

/// A community member with voting rights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Member identifier.
    pub id: MemberId,
    /// Display name, used when formatting deliberation comments.
    pub display_name: String,
    /// Free-form role tag (e.g. "elder", "healer", "member").
    pub role: String,
    /// Voting weight. Non-negative and finite.
    pub voting_weight: f64,
    /// Whether the member currently participates in governance.
    pub active: bool,
}

impl Member {
    /// Create an active member.
    ///
    /// # Errors
    ///
    /// Returns [`GovernanceError::InvalidWeight`] if the weight is
    /// negative, NaN, or infinite.
    pub fn new(
        id: MemberId,
        display_name: impl Into<String>,
        role: impl Into<String>,
        voting_weight: f64,
    ) -> Result<Self, GovernanceError> {
        if !voting_weight.is_finite() || voting_weight < 0.0 {
            return Err(GovernanceError::InvalidWeight(voting_weight));
        }
        Ok(Self {
            id,
            display_name: display_name.into(),
            role: role.into(),
            voting_weight,
            active: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member_id(s: &str) -> MemberId {
        MemberId::new(s).unwrap()
    }

    #[test]
    fn new_member_is_active() {
        let member = Member::new(member_id("elder-1"), "Amara", "elder", 3.0).unwrap();
        assert!(member.active);
        assert_eq!(member.voting_weight, 3.0);
    }

    #[test]
    fn zero_weight_is_allowed() {
        assert!(Member::new(member_id("observer"), "O", "member", 0.0).is_ok());
    }

    #[test]
    fn negative_weight_rejected() {
        assert!(matches!(
            Member::new(member_id("m"), "M", "member", -1.0),
            Err(GovernanceError::InvalidWeight(_))
        ));
    }

    #[test]
    fn nan_weight_rejected() {
        assert!(Member::new(member_id("m"), "M", "member", f64::NAN).is_err());
    }
}
