/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

- `chat`      — Interactive conversation with local session cache
- `sessions`  — List, show and delete cached conversations
- `resources` — Browse support resources
- `account`   — Login, registration, logout, whoami and profile updates
- `messages`  — Server-side chat history and unread messages
- `browse`    — Psychologists, orders and articles
- `admin`     — Administrative record management

Handlers share an [`AppContext`] so that the HTTP client and the session
cache always sit on the same key-value store.
*/

use crate::api::ApiClient;
use crate::config::Config;
use crate::error::{Result, SolaceError};
use crate::session::SessionStore;
use crate::storage::{open_store, KeyValueStore};
use serde_json::Value;
use std::sync::Arc;

pub mod account;
pub mod admin;
pub mod browse;
pub mod chat;
pub mod messages;
pub mod resources;
pub mod sessions;

// Special commands parser for the chat loop
pub mod special_commands;

/// Everything a command handler needs, built once from configuration
#[derive(Clone)]
pub struct AppContext {
    pub config: Config,
    pub store: Arc<dyn KeyValueStore>,
    pub client: Arc<ApiClient>,
    pub sessions: SessionStore,
}

impl AppContext {
    /// Open the configured store and build the client and session cache on it
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be opened or the HTTP client
    /// cannot be built
    pub fn open(config: Config) -> Result<Self> {
        let store = open_store(&config.storage)?;
        Self::with_store(config, store)
    }

    /// Build a context over an already opened store
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn with_store(config: Config, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let client = Arc::new(ApiClient::new(&config.api, store.clone())?);
        let sessions = SessionStore::new(store.clone(), config.storage.key_prefix.clone());
        Ok(Self {
            config,
            store,
            client,
            sessions,
        })
    }
}

/// Shorten `text` to at most `max` characters, marking the cut with `...`
pub(crate) fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", keep)
}

/// Parse a command-line JSON argument that must be an object
pub(crate) fn parse_record(json: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| SolaceError::Validation(format!("invalid JSON record: {}", e)))?;
    if !value.is_object() {
        return Err(SolaceError::Validation("record must be a JSON object".to_string()).into());
    }
    Ok(value)
}

/// Pretty-print a JSON body; `null` prints nothing
pub(crate) fn print_json(value: &Value) -> Result<()> {
    if !value.is_null() {
        println!("{}", serde_json::to_string_pretty(value)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_context_shares_store() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let ctx = AppContext::with_store(Config::default(), store.clone()).unwrap();

        store.set(crate::api::TOKEN_KEY, "t").unwrap();
        assert_eq!(ctx.client.token().as_deref(), Some("t"));

        let id = SessionStore::generate_id();
        assert!(ctx
            .sessions
            .save(&id, &[crate::session::Message::user("hi")]));
        assert!(store
            .get(&ctx.sessions.session_key(&id))
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_parse_record_requires_object() {
        assert!(parse_record(r#"{"name":"Dr. Li"}"#).is_ok());
        assert!(parse_record("[1,2]").is_err());

        let err = parse_record("{name:").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SolaceError>(),
            Some(SolaceError::Validation(_))
        ));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 8), "abcde...");
        assert_eq!(truncate("你好你好你好", 5), "你好...");
    }
}
