//! In-memory key-value store
//!
//! Behaves like a browser's local storage: a flat string map with an
//! optional byte quota. Used by tests and by the `memory` storage backend.

use crate::error::{Result, SolaceError};
use crate::storage::KeyValueStore;
use std::collections::HashMap;
use std::sync::RwLock;

/// Process-local [`KeyValueStore`]
///
/// The quota, when set, bounds the summed byte length of all keys and
/// values. A `set` that would exceed it fails with
/// `SolaceError::QuotaExceeded` and leaves the previous value untouched.
///
/// # Examples
///
/// ```
/// use solace::storage::{KeyValueStore, MemoryStore};
///
/// let store = MemoryStore::with_quota(16);
/// assert!(store.set("a", "short").is_ok());
/// assert!(store.set("b", "this value is far too long").is_err());
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStore {
    /// Create an unbounded store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that refuses writes past `bytes`
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            quota: Some(bytes),
        }
    }

    /// Bytes currently used by keys and values
    pub fn used_bytes(&self) -> usize {
        self.entries
            .read()
            .map(|entries| entries.iter().map(|(k, v)| k.len() + v.len()).sum())
            .unwrap_or_default()
    }
}

fn poisoned() -> anyhow::Error {
    SolaceError::Storage("memory store lock poisoned".to_string()).into()
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;

        if let Some(limit) = self.quota {
            let current: usize = entries.iter().map(|(k, v)| k.len() + v.len()).sum();
            let replaced = entries.get(key).map(|v| key.len() + v.len()).unwrap_or(0);
            let requested = current - replaced + key.len() + value.len();
            if requested > limit {
                return Err(SolaceError::QuotaExceeded { limit, requested }.into());
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.keys().cloned().collect())
    }
}
