//! Chat controller
//!
//! Drives one conversation: holds the transcript in an explicit
//! [`ChatState`], forwards user turns to a [`ChatBackend`], and writes the
//! transcript to the [`SessionStore`] after every exchange. Backend
//! failures never escape as errors; the user sees an apology turn instead.

use crate::config::ChatConfig;
use crate::error::{Result, SolaceError};
use crate::session::{Message, SessionStore};

use async_trait::async_trait;
use std::sync::Arc;

/// Something that can answer a user turn
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Return the assistant's reply to `message`
    async fn send_message(&self, message: &str, session_id: Option<&str>) -> Result<String>;
}

#[async_trait]
impl<T: ChatBackend + ?Sized> ChatBackend for Arc<T> {
    async fn send_message(&self, message: &str, session_id: Option<&str>) -> Result<String> {
        (**self).send_message(message, session_id).await
    }
}

/// State of the conversation on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatState {
    /// Identifier the transcript is saved under
    pub session_id: String,
    /// Transcript in conversation order
    pub messages: Vec<Message>,
    /// True while a request is in flight
    pub sending: bool,
}

/// Result of a send that reached the point of calling the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The backend answered; the reply was appended
    Replied(String),
    /// The backend failed; an apology was appended and this notice should
    /// be shown to the user
    Failed(String),
}

/// Conversation controller over a backend and a session store
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use async_trait::async_trait;
/// use solace::chat::{ChatBackend, ChatController, SendOutcome};
/// use solace::config::ChatConfig;
/// use solace::session::SessionStore;
/// use solace::storage::MemoryStore;
///
/// struct Echo;
///
/// #[async_trait]
/// impl ChatBackend for Echo {
///     async fn send_message(&self, message: &str, _: Option<&str>) -> solace::Result<String> {
///         Ok(format!("you said: {}", message))
///     }
/// }
///
/// # #[tokio::main]
/// # async fn main() -> solace::Result<()> {
/// let sessions = SessionStore::with_default_prefix(Arc::new(MemoryStore::new()));
/// let mut chat = ChatController::new(Echo, sessions, ChatConfig::default());
///
/// let outcome = chat.send("hello").await?;
/// assert_eq!(outcome, SendOutcome::Replied("you said: hello".to_string()));
/// assert_eq!(chat.state().messages.len(), 3);
/// # Ok(())
/// # }
/// ```
pub struct ChatController<B: ChatBackend> {
    backend: B,
    sessions: SessionStore,
    config: ChatConfig,
    state: ChatState,
}

impl<B: ChatBackend> ChatController<B> {
    /// Create a controller positioned on a fresh session
    pub fn new(backend: B, sessions: SessionStore, config: ChatConfig) -> Self {
        let state = fresh_state(&config);
        Self {
            backend,
            sessions,
            config,
            state,
        }
    }

    /// Current conversation state
    pub fn state(&self) -> &ChatState {
        &self.state
    }

    /// Session store the transcript is written to
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Abandon the current conversation and start a new one
    ///
    /// The new transcript holds only the welcome message and is not saved
    /// until the first exchange.
    pub fn new_session(&mut self) -> &ChatState {
        self.state = fresh_state(&self.config);
        tracing::info!(session_id = %self.state.session_id, "Started new chat session");
        &self.state
    }

    /// Switch to a stored session
    ///
    /// Returns `false` and keeps the current state when the session does
    /// not exist or cannot be read.
    pub fn resume(&mut self, session_id: &str) -> bool {
        match self.sessions.load(session_id) {
            Some(session) => {
                tracing::info!(
                    session_id,
                    message_count = session.messages.len(),
                    "Resumed chat session"
                );
                self.state = ChatState {
                    session_id: session.id,
                    messages: session.messages,
                    sending: false,
                };
                true
            }
            None => {
                tracing::warn!(session_id, "Session not found, keeping current conversation");
                false
            }
        }
    }

    /// Send one user turn
    ///
    /// # Errors
    ///
    /// Returns `SolaceError::Validation` for blank input or while another
    /// request is in flight; nothing is sent and the state is unchanged.
    /// Backend failures are not errors: they yield [`SendOutcome::Failed`].
    pub async fn send(&mut self, input: &str) -> Result<SendOutcome> {
        let text = input.trim();
        if text.is_empty() {
            return Err(SolaceError::Validation("message cannot be empty".to_string()).into());
        }
        if self.state.sending {
            return Err(
                SolaceError::Validation("a message is already being sent".to_string()).into(),
            );
        }

        self.state.messages.push(Message::user(text));
        self.state.sending = true;

        let reply = self
            .backend
            .send_message(text, Some(self.state.session_id.as_str()))
            .await;
        self.state.sending = false;

        let outcome = match reply {
            Ok(reply) => {
                self.state.messages.push(Message::assistant(reply.clone()));
                SendOutcome::Replied(reply)
            }
            Err(e) => {
                tracing::error!(error = %e, "Chat request failed");
                self.state
                    .messages
                    .push(Message::assistant(self.config.apology_message.clone()));
                SendOutcome::Failed(user_notice(&e))
            }
        };

        if !self
            .sessions
            .save(&self.state.session_id, &self.state.messages)
        {
            tracing::warn!(
                session_id = %self.state.session_id,
                "Conversation continues but was not saved locally"
            );
        }

        Ok(outcome)
    }
}

fn fresh_state(config: &ChatConfig) -> ChatState {
    ChatState {
        session_id: SessionStore::generate_id(),
        messages: vec![Message::assistant(config.welcome_message.clone())],
        sending: false,
    }
}

/// Short message for the user describing why a request failed
fn user_notice(error: &anyhow::Error) -> String {
    match error.downcast_ref::<SolaceError>() {
        Some(SolaceError::Http(e)) if e.is_timeout() => {
            "The assistant took too long to answer. Please try again.".to_string()
        }
        Some(SolaceError::Http(_)) => {
            "Could not connect to the server. Check your network connection.".to_string()
        }
        Some(SolaceError::Authentication(_)) => {
            "Your login has expired. Please log in again.".to_string()
        }
        Some(SolaceError::Api { status, .. }) => {
            format!("The server could not answer right now (status {}).", status)
        }
        _ => "Failed to send message. Please try again later.".to_string(),
    }
}
