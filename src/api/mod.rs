//! HTTP client for the Solace backend
//!
//! Wraps every endpoint the chat and admin front ends call. Each request
//! picks up the bearer token from the local key-value store at send time,
//! so logging in or out takes effect on the next call without rebuilding
//! the client.

use crate::chat::ChatBackend;
use crate::config::ApiConfig;
use crate::error::{Result, SolaceError};
use crate::storage::KeyValueStore;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

pub mod types;

pub use types::{
    AdminResource, Article, AuthResponse, ChatReply, ChatRequest, Credentials, HistoryQuery, Order,
    PageQuery, Psychologist, RecordId, Registration, Resource, ResourceQuery, UserProfile,
};

/// Key under which the auth token is kept in the local store
pub const TOKEN_KEY: &str = "token";

/// Longest backend error body echoed into an error message
const MAX_ERROR_BODY: usize = 200;

/// Typed client for the backend REST API
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use solace::api::ApiClient;
/// use solace::config::ApiConfig;
/// use solace::storage::MemoryStore;
///
/// let client = ApiClient::new(&ApiConfig::default(), Arc::new(MemoryStore::new())).unwrap();
/// assert_eq!(client.base_url(), "http://localhost:8000/api");
/// ```
pub struct ApiClient {
    client: Client,
    base_url: String,
    chat_path: String,
    store: Arc<dyn KeyValueStore>,
}

impl ApiClient {
    /// Create a client for the configured backend
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn new(config: &ApiConfig, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("solace/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| SolaceError::Config(format!("Failed to create HTTP client: {}", e)))?;

        tracing::debug!("Initialized API client: base_url={}", config.base_url);

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            chat_path: config.chat_path.clone(),
            store,
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Token currently attached to requests, if any
    pub fn token(&self) -> Option<String> {
        match self.store.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read auth token from local storage");
                None
            }
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("{} {}", method, url);

        let builder = self.client.request(method, url);
        match self.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await.map_err(SolaceError::Http)?;
        let status = response.status();
        let body = response.text().await.map_err(SolaceError::Http)?;

        if status == StatusCode::UNAUTHORIZED {
            return Err(SolaceError::Authentication(error_message(&body, status)).into());
        }
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Backend request failed");
            return Err(SolaceError::Api {
                status: status.as_u16(),
                message: error_message(&body, status),
            }
            .into());
        }

        let body = if body.trim().is_empty() { "null" } else { &body };
        Ok(serde_json::from_str(body)?)
    }

    async fn execute_list<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<Vec<T>> {
        let value: serde_json::Value = self.execute(builder).await?;
        Ok(types::decode_list(value)?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.execute(self.request(Method::GET, path)).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(self.request(Method::POST, path).json(body)).await
    }

    async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(self.request(Method::PUT, path).json(body)).await
    }

    // Chat

    /// Send one user turn and return the assistant's reply
    pub async fn send_message(&self, message: &str, session_id: Option<&str>) -> Result<String> {
        let request = ChatRequest {
            message,
            session_id,
        };
        let reply: ChatReply = self.post(&self.chat_path, &request).await?;
        Ok(reply.response)
    }

    /// Ask the backend to open a named chat session
    pub async fn create_chat_session(&self, name: &str) -> Result<serde_json::Value> {
        self.post("/chat/sessions", &serde_json::json!({ "name": name }))
            .await
    }

    /// Server-side chat history, filtered by the given query parameters
    pub async fn chat_history(&self, query: &HistoryQuery) -> Result<serde_json::Value> {
        self.execute(self.request(Method::GET, "/chat/history").query(query))
            .await
    }

    /// Messages the current user has not read yet
    pub async fn unread_messages(&self) -> Result<serde_json::Value> {
        self.get("/chat/unread").await
    }

    // Resources

    /// List support resources matching the filters
    pub async fn resources(&self, query: &ResourceQuery) -> Result<Vec<Resource>> {
        self.execute_list(self.request(Method::GET, "/resources").query(query))
            .await
    }

    // Users

    /// Exchange credentials for a token
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
        self.post("/user/login", credentials).await
    }

    /// Create an account
    pub async fn register(&self, registration: &Registration) -> Result<AuthResponse> {
        self.post("/user/register", registration).await
    }

    /// Profile of the logged-in user
    pub async fn user_info(&self) -> Result<UserProfile> {
        self.get("/user/info").await
    }

    /// Update the logged-in user's profile
    pub async fn update_user_info(&self, update: &serde_json::Value) -> Result<serde_json::Value> {
        self.put("/user/update", update).await
    }

    /// Invalidate the token server-side
    pub async fn logout(&self) -> Result<()> {
        let _: serde_json::Value = self.post("/user/logout", &serde_json::json!({})).await?;
        Ok(())
    }

    // Psychologists

    /// Browse psychologists
    pub async fn psychologists(&self, query: &PageQuery) -> Result<Vec<Psychologist>> {
        self.execute_list(self.request(Method::GET, "/psychologist/list").query(query))
            .await
    }

    /// One psychologist's profile
    pub async fn psychologist(&self, id: &RecordId) -> Result<Psychologist> {
        self.get(&format!("/psychologist/detail/{}", id)).await
    }

    /// Psychologists the backend recommends for the current user
    pub async fn recommended_psychologists(&self) -> Result<Vec<Psychologist>> {
        self.execute_list(self.request(Method::GET, "/psychologist/recommend"))
            .await
    }

    // Orders

    /// Book a session with a psychologist
    pub async fn create_order(&self, order: &serde_json::Value) -> Result<Order> {
        self.post("/order/create", order).await
    }

    /// The current user's orders
    pub async fn orders(&self, query: &PageQuery) -> Result<Vec<Order>> {
        self.execute_list(self.request(Method::GET, "/order/list").query(query))
            .await
    }

    /// One order
    pub async fn order(&self, id: &RecordId) -> Result<Order> {
        self.get(&format!("/order/detail/{}", id)).await
    }

    /// Cancel an order
    pub async fn cancel_order(&self, id: &RecordId) -> Result<serde_json::Value> {
        self.put(&format!("/order/cancel/{}", id), &serde_json::json!({}))
            .await
    }

    // Articles

    /// Browse published articles
    pub async fn articles(&self, query: &PageQuery) -> Result<Vec<Article>> {
        self.execute_list(self.request(Method::GET, "/article/list").query(query))
            .await
    }

    /// One article
    pub async fn article(&self, id: &RecordId) -> Result<Article> {
        self.get(&format!("/article/detail/{}", id)).await
    }

    // Admin

    /// List records of one kind
    pub async fn admin_list(
        &self,
        resource: AdminResource,
        query: &PageQuery,
    ) -> Result<Vec<serde_json::Value>> {
        let path = format!("/admin/{}/list", resource.path_segment());
        self.execute_list(self.request(Method::GET, &path).query(query))
            .await
    }

    /// Create a record
    ///
    /// # Errors
    ///
    /// Returns `SolaceError::Validation` without sending anything when the
    /// backend has no add endpoint for `resource`
    pub async fn admin_add(
        &self,
        resource: AdminResource,
        record: &serde_json::Value,
    ) -> Result<serde_json::Value> {
        if !resource.supports_add() {
            return Err(SolaceError::Validation(format!(
                "{} records cannot be added by an admin",
                resource
            ))
            .into());
        }
        self.post(&format!("/admin/{}/add", resource.path_segment()), record)
            .await
    }

    /// Replace fields of a record
    pub async fn admin_update(
        &self,
        resource: AdminResource,
        id: &RecordId,
        record: &serde_json::Value,
    ) -> Result<serde_json::Value> {
        self.put(
            &format!("/admin/{}/update/{}", resource.path_segment(), id),
            record,
        )
        .await
    }

    /// Delete a record
    pub async fn admin_delete(&self, resource: AdminResource, id: &RecordId) -> Result<()> {
        let path = format!("/admin/{}/delete/{}", resource.path_segment(), id);
        let _: serde_json::Value = self.execute(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }
}

#[async_trait]
impl ChatBackend for ApiClient {
    async fn send_message(&self, message: &str, session_id: Option<&str>) -> Result<String> {
        ApiClient::send_message(self, message, session_id).await
    }
}

/// Pull a human-readable message out of an error body
///
/// FastAPI backends answer `{"detail": ...}`, the user service answers
/// `{"message": ...}`; anything else is echoed truncated.
fn error_message(body: &str, status: StatusCode) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for field in ["detail", "message", "error"] {
            if let Some(text) = value.get(field).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string();
    }

    match trimmed.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_new_trims_trailing_slash() {
        let config = ApiConfig {
            base_url: "http://localhost:8000/api/".to_string(),
            ..Default::default()
        };
        let client = ApiClient::new(&config, Arc::new(MemoryStore::new())).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/api");
    }

    #[test]
    fn test_token_read_from_store() {
        let store = Arc::new(MemoryStore::new());
        let client = ApiClient::new(&ApiConfig::default(), store.clone()).unwrap();
        assert!(client.token().is_none());

        store.set(TOKEN_KEY, "abc").unwrap();
        assert_eq!(client.token().as_deref(), Some("abc"));

        store.set(TOKEN_KEY, "").unwrap();
        assert!(client.token().is_none());
    }

    #[test]
    fn test_error_message_prefers_detail_field() {
        let msg = error_message(
            r#"{"detail":"Database connection error"}"#,
            StatusCode::INTERNAL_SERVER_ERROR,
        );
        assert_eq!(msg, "Database connection error");

        let msg = error_message(r#"{"message":"bad password"}"#, StatusCode::BAD_REQUEST);
        assert_eq!(msg, "bad password");
    }

    #[test]
    fn test_error_message_falls_back_to_reason_or_body() {
        assert_eq!(
            error_message("", StatusCode::SERVICE_UNAVAILABLE),
            "Service Unavailable"
        );
        assert_eq!(error_message("gateway down", StatusCode::BAD_GATEWAY), "gateway down");

        let long = "x".repeat(500);
        let msg = error_message(&long, StatusCode::BAD_GATEWAY);
        assert!(msg.ends_with("..."));
        assert_eq!(msg.len(), MAX_ERROR_BODY + 3);
    }
}
