//! # Opaque Metadata Bags
//!
//! Defines [`Metadata`], the open key→value bag attached to knowledge
//! items (cultural protocols) and ledger contributions. Core logic never
//! branches on its contents — only display and policy layers outside the
//! core interpret keys.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An open key→value bag carried opaquely through the core.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, Value>);

impl Metadata {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key, returning `self` for builder-style chaining.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Look up a key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the bag is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_chaining() {
        let meta = Metadata::new()
            .with("ceremony_required", true)
            .with("seasonal_restriction", "winter_only");
        assert_eq!(meta.len(), 2);
        assert_eq!(meta.get("ceremony_required"), Some(&json!(true)));
    }

    #[test]
    fn serde_is_transparent() {
        let meta = Metadata::new().with("origin", "river_valley");
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json, json!({"origin": "river_valley"}));
    }
}
