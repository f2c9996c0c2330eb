//! # Protected Knowledge Items
//!
//! A [`KnowledgeItem`] is one unit of community-held knowledge. The
//! governance engine is the only writer of its authorization set and
//! access history; the history is append-only — revocation removes
//! authorization prospectively but never erases the record of a grant.
//!
//! Sensitivity tiers are opaque to governance logic; they exist for
//! display and policy layers outside the core.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use equipath_core::{KnowledgeId, Metadata, PartyId, Timestamp};

use crate::request::AccessLevel;

/// Sensitivity tier of a knowledge item. Carried, never interpreted, by
/// the governance engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sensitivity {
    /// Freely shareable.
    Public,
    /// Shareable only under community consent.
    Sensitive,
    /// Subject to the strictest cultural protocols.
    Sacred,
}

impl Sensitivity {
    /// The canonical string name of this tier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Sensitive => "sensitive",
            Self::Sacred => "sacred",
        }
    }
}

impl std::fmt::Display for Sensitivity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry in a knowledge item's append-only access history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AccessEvent {
    /// Access was granted following an approved request.
    Granted {
        /// The party granted access.
        requester: PartyId,
        /// The requester's organization.
        organization: String,
        /// The access level granted.
        level: AccessLevel,
        /// Approve weight of the deciding tally.
        approve_weight: f64,
        /// Deny weight of the deciding tally.
        deny_weight: f64,
        /// When access was granted.
        at: Timestamp,
    },
    /// Access was revoked.
    Revoked {
        /// The party whose access was withdrawn.
        requester: PartyId,
        /// The community's stated reason.
        reason: String,
        /// When access was revoked.
        at: Timestamp,
    },
}

/// A protected knowledge item owned by the community.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeItem {
    /// Item identifier.
    pub id: KnowledgeId,
    /// Human-readable title.
    pub title: String,
    /// Category tag; access requests reference items by category.
    pub category: String,
    /// Sensitivity tier, opaque to governance logic.
    pub sensitivity: Sensitivity,
    /// Parties currently authorized to access this item.
    pub authorized: BTreeSet<PartyId>,
    /// Append-only grant/revoke history.
    pub access_history: Vec<AccessEvent>,
    /// Opaque cultural-protocol metadata.
    pub protocols: Metadata,
}

impl KnowledgeItem {
    /// Create an item with no authorizations and empty history.
    pub fn new(
        id: KnowledgeId,
        title: impl Into<String>,
        category: impl Into<String>,
        sensitivity: Sensitivity,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            category: category.into(),
            sensitivity,
            authorized: BTreeSet::new(),
            access_history: Vec::new(),
            protocols: Metadata::new(),
        }
    }

    /// Attach cultural-protocol metadata, builder-style.
    pub fn with_protocols(mut self, protocols: Metadata) -> Self {
        self.protocols = protocols;
        self
    }

    /// Whether `party` is currently authorized.
    pub fn is_authorized(&self, party: &PartyId) -> bool {
        self.authorized.contains(party)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_item_has_no_authorizations() {
        let item = KnowledgeItem::new(
            KnowledgeId::new(),
            "Willow bark preparation",
            "medicinal_plants",
            Sensitivity::Sensitive,
        );
        assert!(item.authorized.is_empty());
        assert!(item.access_history.is_empty());
        assert!(!item.is_authorized(&PartyId::new("anyone").unwrap()));
    }

    #[test]
    fn protocols_are_carried_opaquely() {
        let item = KnowledgeItem::new(
            KnowledgeId::new(),
            "Ceremonial song",
            "ceremonies",
            Sensitivity::Sacred,
        )
        .with_protocols(Metadata::new().with("season", "winter"));
        assert_eq!(item.protocols.len(), 1);
    }

    #[test]
    fn access_event_serde_is_tagged() {
        let event = AccessEvent::Revoked {
            requester: PartyId::new("lab").unwrap(),
            reason: "protocol breach".to_string(),
            at: Timestamp::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "revoked");
    }
}
