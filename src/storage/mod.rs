//! Local key-value storage
//!
//! Everything Solace keeps on the client side (chat sessions, the auth
//! token) goes through the [`KeyValueStore`] trait. Two backends exist:
//! [`MemoryStore`] for tests and throwaway runs, and [`SledStore`] for
//! durable storage between invocations.

use crate::config::{StorageBackend, StorageConfig};
use crate::error::Result;
use std::sync::Arc;

pub mod memory;
pub mod sled_store;

pub use memory::MemoryStore;
pub use sled_store::SledStore;

/// Synchronous string key-value store
///
/// Each call is atomic for its own key only; there are no transactions
/// spanning several keys. `keys()` returns every key in unspecified order.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing an absent key is not an error
    fn remove(&self, key: &str) -> Result<()>;

    /// List every key currently held
    fn keys(&self) -> Result<Vec<String>>;
}

/// Open the store described by `config`
///
/// # Errors
///
/// Returns `SolaceError::Storage` if the sled database cannot be opened or
/// its location cannot be resolved
///
/// # Examples
///
/// ```
/// use solace::config::{StorageBackend, StorageConfig};
/// use solace::storage::open_store;
///
/// let config = StorageConfig {
///     backend: StorageBackend::Memory,
///     ..Default::default()
/// };
/// let store = open_store(&config).unwrap();
/// store.set("greeting", "hi").unwrap();
/// assert_eq!(store.get("greeting").unwrap().as_deref(), Some("hi"));
/// ```
pub fn open_store(config: &StorageConfig) -> Result<Arc<dyn KeyValueStore>> {
    match config.backend {
        StorageBackend::Memory => {
            tracing::debug!("Using in-memory key-value store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageBackend::Sled => {
            let path = config.resolve_path()?;
            tracing::debug!("Opening sled key-value store at {}", path.display());
            Ok(Arc::new(SledStore::open(path)?))
        }
    }
}
