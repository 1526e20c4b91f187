//! Solace - counselling chat client library
//!
//! This library provides the core functionality for the Solace client:
//! talking to the counselling backend, keeping chat transcripts in a local
//! session cache, and the login and admin flows around them.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `storage`: Key-value store abstraction (in-memory and sled backends)
//! - `session`: Chat session cache built on the key-value store
//! - `api`: Typed HTTP client for the backend REST API
//! - `auth`: Login, registration and token handling
//! - `chat`: Conversation controller with explicit state
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//! - `commands`: Handlers invoked by the CLI entrypoint
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use solace::{ApiClient, ChatController, Config, SessionStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let store = solace::storage::open_store(&config.storage)?;
//!     let client = Arc::new(ApiClient::new(&config.api, store.clone())?);
//!     let sessions = SessionStore::new(store, config.storage.key_prefix.clone());
//!
//!     let mut chat = ChatController::new(client, sessions, config.chat.clone());
//!     chat.send("I have trouble sleeping lately").await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod chat;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use api::ApiClient;
pub use auth::AuthSession;
pub use chat::{ChatBackend, ChatController, ChatState, SendOutcome};
pub use config::Config;
pub use error::{Result, SolaceError};
pub use session::{Message, Role, Session, SessionStore, SessionSummary};
pub use storage::{KeyValueStore, MemoryStore, SledStore};
