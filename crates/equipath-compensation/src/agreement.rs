//! # Benefit-Sharing Agreements
//!
//! A [`BenefitSharingAgreement`] binds a researcher organization to
//! compensation terms over one recorded contribution: an up-front base
//! amount, a royalty percentage of downstream revenue, named milestone
//! payouts, and the community-fund share carved out of each royalty
//! distribution.
//!
//! Percentages are stored as whole percents (5.0 means 5%), matching how
//! agreements are negotiated and written down.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use equipath_core::{AgreementId, Amount, ContributionId, PartyId, Timestamp};

/// Compensation terms agreed between a researcher organization and the
/// contributing community.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenefitSharingAgreement {
    /// Agreement identifier.
    pub id: AgreementId,
    /// The ledger contribution the terms cover.
    pub contribution: ContributionId,
    /// The paying researcher organization.
    pub researcher_organization: String,
    /// The community fund party receiving community shares.
    pub community: PartyId,
    /// Up-front base compensation.
    pub base_amount: Amount,
    /// Royalty as a whole percentage of revenue (5.0 = 5%).
    pub royalty_percent: f64,
    /// Named milestone payouts.
    pub milestones: BTreeMap<String, Amount>,
    /// Community-fund share of each royalty, as a whole percentage.
    pub community_fund_percent: f64,
    /// Free-form terms text.
    pub terms: String,
    /// When the agreement was signed.
    pub signed_at: Timestamp,
    /// Whether distributions may run against this agreement.
    pub active: bool,
}

impl BenefitSharingAgreement {
    /// Create an active agreement with no milestones and empty terms.
    pub fn new(
        id: AgreementId,
        contribution: ContributionId,
        researcher_organization: impl Into<String>,
        community: PartyId,
        base_amount: Amount,
        royalty_percent: f64,
        community_fund_percent: f64,
    ) -> Self {
        Self {
            id,
            contribution,
            researcher_organization: researcher_organization.into(),
            community,
            base_amount,
            royalty_percent,
            milestones: BTreeMap::new(),
            community_fund_percent,
            terms: String::new(),
            signed_at: Timestamp::now(),
            active: true,
        }
    }

    /// Add a named milestone payout, builder-style.
    pub fn with_milestone(mut self, name: impl Into<String>, amount: Amount) -> Self {
        self.milestones.insert(name.into(), amount);
        self
    }

    /// Set the terms text, builder-style.
    pub fn with_terms(mut self, terms: impl Into<String>) -> Self {
        self.terms = terms.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_agreement_is_active_with_no_milestones() {
        let agreement = BenefitSharingAgreement::new(
            AgreementId::new(),
            ContributionId::from_sequence(0),
            "University Lab",
            PartyId::new("river-valley-fund").unwrap(),
            Amount::new(50_000.0).unwrap(),
            5.0,
            30.0,
        );
        assert!(agreement.active);
        assert!(agreement.milestones.is_empty());
    }

    #[test]
    fn milestones_accumulate_by_name() {
        let agreement = BenefitSharingAgreement::new(
            AgreementId::new(),
            ContributionId::from_sequence(0),
            "Lab",
            PartyId::new("fund").unwrap(),
            Amount::ZERO,
            5.0,
            30.0,
        )
        .with_milestone("clinical_trial_phase_1", Amount::new(25_000.0).unwrap())
        .with_milestone("product_launch", Amount::new(100_000.0).unwrap());
        assert_eq!(agreement.milestones.len(), 2);
        assert_eq!(
            agreement.milestones["product_launch"].value(),
            100_000.0
        );
    }
}
