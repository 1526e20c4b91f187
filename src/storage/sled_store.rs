//! Durable key-value store backed by `sled`

use crate::error::{Result, SolaceError};
use crate::storage::KeyValueStore;
use sled::Db;
use std::path::Path;

/// On-disk [`KeyValueStore`]
///
/// Values are stored as UTF-8 bytes. Every write is flushed before
/// returning so a crash right after `set` does not lose the session.
pub struct SledStore {
    db: Db,
}

impl SledStore {
    /// Open or create a store at `path`
    ///
    /// Parent directories are created as needed.
    ///
    /// # Errors
    ///
    /// Returns `SolaceError::Storage` if the directory cannot be created or
    /// the database cannot be opened (for example when another process
    /// holds it)
    ///
    /// # Examples
    ///
    /// ```
    /// use solace::storage::{KeyValueStore, SledStore};
    ///
    /// # fn main() -> solace::error::Result<()> {
    /// let dir = tempfile::tempdir()?;
    /// let store = SledStore::open(dir.path().join("store"))?;
    /// store.set("token", "abc")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SolaceError::Storage(format!("Failed to create store directory: {}", e))
            })?;
        }

        let db = sled::open(path)
            .map_err(|e| SolaceError::Storage(format!("Failed to open database: {}", e)))?;
        Ok(Self { db })
    }

    fn flush(&self) -> Result<()> {
        self.db
            .flush()
            .map_err(|e| SolaceError::Storage(format!("Flush failed: {}", e)))?;
        Ok(())
    }
}

impl KeyValueStore for SledStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self
            .db
            .get(key.as_bytes())
            .map_err(|e| SolaceError::Storage(format!("Get failed: {}", e)))?
        {
            Some(bytes) => {
                let value = String::from_utf8(bytes.to_vec()).map_err(|e| {
                    SolaceError::Storage(format!("Value under {} is not UTF-8: {}", key, e))
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.db
            .insert(key.as_bytes(), value.as_bytes())
            .map_err(|e| SolaceError::Storage(format!("Insert failed: {}", e)))?;
        self.flush()
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.db
            .remove(key.as_bytes())
            .map_err(|e| SolaceError::Storage(format!("Remove failed: {}", e)))?;
        self.flush()
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for result in self.db.iter().keys() {
            let key =
                result.map_err(|e| SolaceError::Storage(format!("Iteration failed: {}", e)))?;
            match String::from_utf8(key.to_vec()) {
                Ok(k) => keys.push(k),
                Err(_) => tracing::warn!("Skipping non UTF-8 key in sled store"),
            }
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (SledStore, TempDir) {
        let dir = TempDir::new().expect("failed to create tempdir");
        let store = SledStore::open(dir.path().join("store")).expect("failed to open store");
        (store, dir)
    }

    #[test]
    fn test_set_get_remove() {
        let (store, _dir) = create_test_store();
        store.set("chat_session_a", "{}").unwrap();
        assert_eq!(store.get("chat_session_a").unwrap().as_deref(), Some("{}"));

        store.remove("chat_session_a").unwrap();
        assert!(store.get("chat_session_a").unwrap().is_none());
    }

    #[test]
    fn test_remove_missing_key_is_ok() {
        let (store, _dir) = create_test_store();
        assert!(store.remove("never-written").is_ok());
    }

    #[test]
    fn test_keys_lists_all_entries() {
        let (store, _dir) = create_test_store();
        store.set("token", "t").unwrap();
        store.set("chat_session_1", "{}").unwrap();

        let mut keys = store.keys().unwrap();
        keys.sort();
        assert_eq!(keys, vec!["chat_session_1".to_string(), "token".to_string()]);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("store");
        {
            let store = SledStore::open(&path).expect("open");
            store.set("token", "persisted").unwrap();
        }

        let reopened = SledStore::open(&path).expect("reopen");
        assert_eq!(reopened.get("token").unwrap().as_deref(), Some("persisted"));
    }
}
