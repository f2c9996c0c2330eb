//! # equipath-store — Key-Value Persistence Contract
//!
//! The governance, ledger, and compensation crates persist their entity
//! tables through the [`KeyValueStore`] trait rather than a concrete
//! backend. Each entity type writes under a stable key prefix
//! (`request/`, `member/`, `knowledge/`, `contribution/`, `agreement/`,
//! `payment/`) so a backend can scan one table without touching others.
//!
//! ## Write-Behind Semantics
//!
//! Components commit to their in-memory state first and persist after;
//! the in-memory state is authoritative for reads. A store failure is
//! surfaced to the caller's logging layer, not used to roll back the
//! commit — retry and durability policy belong to the backend.
//!
//! The bundled [`MemoryStore`] is the reference backend: DashMap-based,
//! cheaply cloneable, suitable for tests and single-process deployments.

use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;

/// Errors surfaced by a persistence backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backend could not complete the operation.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Abstract key-value persistence contract.
///
/// Keys are UTF-8 strings with `/`-delimited prefixes; values are opaque
/// serialized bytes. Implementations must be safe to call from multiple
/// threads.
pub trait KeyValueStore: Send + Sync {
    /// Store `value` under `key`, replacing any existing value.
    fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;

    /// Fetch the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Return all `(key, value)` pairs whose key starts with `prefix`,
    /// sorted by key.
    fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, StoreError>;

    /// Remove the value stored under `key`. Removing an absent key is a
    /// no-op.
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// In-memory reference backend.
///
/// Cheaply cloneable via `Arc` — all clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<DashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.get(key).map(|v| v.clone()))
    }

    fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, StoreError> {
        let mut matches: Vec<(String, Vec<u8>)> = self
            .entries
            .iter()
            .filter(|entry| entry.key().starts_with(prefix))
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        matches.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(matches)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_then_get() {
        let store = MemoryStore::new();
        store.put("request/abc", b"payload".to_vec()).unwrap();
        assert_eq!(store.get("request/abc").unwrap(), Some(b"payload".to_vec()));
        assert_eq!(store.get("request/missing").unwrap(), None);
    }

    #[test]
    fn put_replaces() {
        let store = MemoryStore::new();
        store.put("k", b"v1".to_vec()).unwrap();
        store.put("k", b"v2".to_vec()).unwrap();
        assert_eq!(store.get("k").unwrap(), Some(b"v2".to_vec()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn scan_prefix_is_sorted_and_scoped() {
        let store = MemoryStore::new();
        store.put("payment/2", b"b".to_vec()).unwrap();
        store.put("payment/1", b"a".to_vec()).unwrap();
        store.put("agreement/1", b"x".to_vec()).unwrap();

        let scanned = store.scan_prefix("payment/").unwrap();
        assert_eq!(scanned.len(), 2);
        assert_eq!(scanned[0].0, "payment/1");
        assert_eq!(scanned[1].0, "payment/2");
    }

    #[test]
    fn delete_is_idempotent() {
        let store = MemoryStore::new();
        store.put("k", b"v".to_vec()).unwrap();
        store.delete("k").unwrap();
        store.delete("k").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn clones_share_data() {
        let store = MemoryStore::new();
        let clone = store.clone();
        store.put("shared", b"yes".to_vec()).unwrap();
        assert_eq!(clone.get("shared").unwrap(), Some(b"yes".to_vec()));
    }
}
