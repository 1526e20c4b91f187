//! Chat session cache
//!
//! Persists conversation transcripts in a [`KeyValueStore`], one record per
//! session under a namespaced key. Every operation is fail-soft: storage
//! and decode failures are logged and turned into `false` / `None` / an
//! empty listing, so a broken store never takes the chat down with it.

use crate::error::{Result, SolaceError};
use crate::storage::KeyValueStore;
use chrono::Utc;
use std::sync::Arc;

pub mod id;
pub mod types;

pub use id::generate_id;
pub use types::{Message, Role, Session, SessionSummary};

/// Namespace prefix for session keys unless configured otherwise
pub const DEFAULT_KEY_PREFIX: &str = "chat_session_";

/// Session persistence over an injected key-value store
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use solace::session::{Message, SessionStore};
/// use solace::storage::MemoryStore;
///
/// let store = SessionStore::with_default_prefix(Arc::new(MemoryStore::new()));
/// let id = SessionStore::generate_id();
///
/// assert!(store.save(&id, &[Message::user("hello")]));
/// let session = store.load(&id).unwrap();
/// assert_eq!(session.messages.len(), 1);
/// assert_eq!(store.list()[0].message_count, 1);
/// ```
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
    prefix: String,
}

impl SessionStore {
    /// Create a store whose keys are `prefix` followed by the session id
    pub fn new(store: Arc<dyn KeyValueStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    /// Create a store using [`DEFAULT_KEY_PREFIX`]
    pub fn with_default_prefix(store: Arc<dyn KeyValueStore>) -> Self {
        Self::new(store, DEFAULT_KEY_PREFIX)
    }

    /// Storage key for a session id
    pub fn session_key(&self, session_id: &str) -> String {
        format!("{}{}", self.prefix, session_id)
    }

    /// Generate a fresh session identifier
    pub fn generate_id() -> String {
        generate_id()
    }

    /// Persist the full transcript of a session
    ///
    /// Writes `{id, messages, lastUpdated: now}`. Returns `false` (after
    /// logging) when serialization or the underlying write fails; the
    /// previously stored version, if any, is left in place.
    pub fn save(&self, session_id: &str, messages: &[Message]) -> bool {
        match self.try_save(session_id, messages) {
            Ok(()) => {
                tracing::debug!(
                    session_id,
                    message_count = messages.len(),
                    "Saved chat session"
                );
                true
            }
            Err(e) => {
                tracing::error!(session_id, error = %e, "Error saving session to local storage");
                false
            }
        }
    }

    fn try_save(&self, session_id: &str, messages: &[Message]) -> Result<()> {
        let session = Session {
            id: session_id.to_string(),
            messages: messages.to_vec(),
            last_updated: Utc::now(),
        };
        let value = serde_json::to_string(&session)?;
        self.store.set(&self.session_key(session_id), &value)
    }

    /// Load a session
    ///
    /// Returns `None` when the session was never saved, was deleted, or
    /// cannot be read or decoded; the latter two cases are logged.
    pub fn load(&self, session_id: &str) -> Option<Session> {
        let key = self.session_key(session_id);
        match self.try_load(&key, session_id) {
            Ok(session) => session,
            Err(e) => {
                tracing::error!(session_id, error = %e, "Error loading session from local storage");
                None
            }
        }
    }

    fn try_load(&self, key: &str, session_id: &str) -> Result<Option<Session>> {
        match self.store.get(key)? {
            Some(raw) => Ok(Some(decode_record(key, session_id, &raw)?)),
            None => Ok(None),
        }
    }

    /// Summaries of every stored session, most recently updated first
    ///
    /// Scans the whole key space. Records that fail to decode are skipped
    /// with a warning; if the scan itself fails the result is empty.
    pub fn list(&self) -> Vec<SessionSummary> {
        let keys = match self.store.keys() {
            Ok(keys) => keys,
            Err(e) => {
                tracing::error!(error = %e, "Error getting sessions list");
                return Vec::new();
            }
        };

        let mut summaries: Vec<SessionSummary> = keys
            .iter()
            .filter_map(|key| {
                let session_id = key.strip_prefix(&self.prefix)?;
                match self.try_load(key, session_id) {
                    Ok(Some(session)) => Some(SessionSummary::from(&session)),
                    Ok(None) => None,
                    Err(e) => {
                        tracing::warn!(key = %key, error = %e, "Skipping malformed session record");
                        None
                    }
                }
            })
            .collect();

        summaries.sort_by(|a, b| {
            b.last_updated
                .cmp(&a.last_updated)
                .then_with(|| a.id.cmp(&b.id))
        });
        summaries
    }

    /// Whether any record, readable or not, is stored for `session_id`
    ///
    /// Unlike [`load`](Self::load) this does not decode the record, so a
    /// damaged session still counts as present and can be deleted.
    pub fn exists(&self, session_id: &str) -> bool {
        match self.store.get(&self.session_key(session_id)) {
            Ok(raw) => raw.is_some(),
            Err(e) => {
                tracing::error!(session_id, error = %e, "Error checking session in local storage");
                false
            }
        }
    }

    /// Remove a session
    ///
    /// Deleting an id that was never saved succeeds. Returns `false` only
    /// when the underlying store fails, which is logged.
    pub fn delete(&self, session_id: &str) -> bool {
        match self.store.remove(&self.session_key(session_id)) {
            Ok(()) => {
                tracing::debug!(session_id, "Deleted chat session");
                true
            }
            Err(e) => {
                tracing::error!(session_id, error = %e, "Error deleting session");
                false
            }
        }
    }
}

fn decode_record(key: &str, session_id: &str, raw: &str) -> Result<Session> {
    let session: Session =
        serde_json::from_str(raw).map_err(|e| SolaceError::CorruptedRecord {
            key: key.to_string(),
            message: e.to_string(),
        })?;

    if session.id != session_id {
        return Err(SolaceError::CorruptedRecord {
            key: key.to_string(),
            message: format!("record id {} does not match key", session.id),
        }
        .into());
    }

    Ok(session)
}
