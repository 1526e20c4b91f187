//! Wire types for the Solace backend

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Record identifier as returned by the backend (numeric or string)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    /// Auto-increment database id
    Int(i64),
    /// Opaque string id
    Str(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(id) => write!(f, "{}", id),
            RecordId::Str(id) => write!(f, "{}", id),
        }
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        RecordId::Int(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        match id.parse::<i64>() {
            Ok(n) => RecordId::Int(n),
            Err(_) => RecordId::Str(id.to_string()),
        }
    }
}

/// Body of a chat request
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    /// The user's turn
    pub message: &'a str,
    /// Session the turn belongs to, when the client tracks one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<&'a str>,
}

/// Assistant reply to a chat request
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    /// Reply text (`text` is accepted from LLM gateways that use it)
    #[serde(alias = "text")]
    pub response: String,
}

/// Filters for the resources listing
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResourceQuery {
    /// Resource category, e.g. `hotline`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Location tag, e.g. a city name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Maximum number of records (backend default 50)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// A support resource (hotline, clinic, self-help material)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: RecordId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub location_tag: Option<String>,
    #[serde(default)]
    pub contact_info: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Login payload
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Registration payload
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub email: String,
}

/// Response of the login and register endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A user account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    /// Fields this client does not model
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A psychologist profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Psychologist {
    pub id: RecordId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A counselling order (booking)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: RecordId,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub psychologist_id: Option<RecordId>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A published article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: RecordId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Pagination and search parameters for list endpoints
///
/// Sent as `?page=&limit=&search=`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageQuery {
    /// Page number, 1-based
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Records per page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Free-text filter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

/// Filters for the server-side chat history
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub psychologist_id: Option<String>,
}

/// Record kinds managed through the admin endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminResource {
    Users,
    Psychologists,
    Orders,
    Articles,
}

impl AdminResource {
    /// Path segment used by the admin endpoints
    pub fn path_segment(&self) -> &'static str {
        match self {
            AdminResource::Users => "user",
            AdminResource::Psychologists => "psychologist",
            AdminResource::Orders => "order",
            AdminResource::Articles => "article",
        }
    }

    /// Whether the backend exposes an `add` endpoint for this kind
    ///
    /// Users sign up through registration and orders are created by users,
    /// so only psychologists and articles can be added by an admin.
    pub fn supports_add(&self) -> bool {
        matches!(self, AdminResource::Psychologists | AdminResource::Articles)
    }
}

impl fmt::Display for AdminResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path_segment())
    }
}

/// Decode a list endpoint body that is either a bare array or an envelope
///
/// Envelopes carry the records under `data`, `list`, `items` or `records`.
pub(crate) fn decode_list<T: DeserializeOwned>(
    value: serde_json::Value,
) -> serde_json::Result<Vec<T>> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ListEnvelope<T> {
        Bare(Vec<T>),
        Wrapped {
            #[serde(alias = "list", alias = "items", alias = "records")]
            data: Vec<T>,
        },
    }

    let envelope: ListEnvelope<T> = serde_json::from_value(value)?;
    Ok(match envelope {
        ListEnvelope::Bare(items) => items,
        ListEnvelope::Wrapped { data } => data,
    })
}
