use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person chatting
    User,
    /// The backend's reply
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One turn in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Message {
    /// Author of the turn
    pub role: Role,
    /// Text payload
    pub content: String,
}

impl Message {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A persisted conversation transcript
///
/// Field names follow the stored layout (`lastUpdated`), so records
/// written by earlier clients decode unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Session {
    /// Client-generated identifier
    pub id: String,
    /// Turns in conversation order
    pub messages: Vec<Message>,
    /// Time of the most recent save
    pub last_updated: DateTime<Utc>,
}

/// Listing projection of a [`Session`]
///
/// Always computed from the stored record, never persisted on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    /// Session identifier
    pub id: String,
    /// Time of the most recent save
    pub last_updated: DateTime<Utc>,
    /// Number of messages in the transcript
    pub message_count: usize,
    /// First line of the first user turn, if the user has spoken
    pub preview: Option<String>,
}

impl From<&Session> for SessionSummary {
    fn from(session: &Session) -> Self {
        let preview = session
            .messages
            .iter()
            .find(|m| m.role == Role::User)
            .and_then(|m| m.content.lines().next())
            .map(str::to_string);

        Self {
            id: session.id.clone(),
            last_updated: session.last_updated,
            message_count: session.messages.len(),
            preview,
        }
    }
}
