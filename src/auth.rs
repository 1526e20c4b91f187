//! Login, registration and token handling
//!
//! Input is validated before any request is made. A successful login
//! stores the token in the local key-value store, where
//! [`ApiClient`](crate::api::ApiClient) picks it up for later requests.

use crate::api::{ApiClient, AuthResponse, Credentials, Registration, UserProfile, TOKEN_KEY};
use crate::error::{Result, SolaceError};
use crate::storage::KeyValueStore;
use std::sync::Arc;

/// Check login input before it is sent
///
/// # Errors
///
/// Returns `SolaceError::Validation` if either field is blank
pub fn validate_login(username: &str, password: &str) -> Result<()> {
    if username.trim().is_empty() {
        return Err(SolaceError::Validation("username is required".to_string()).into());
    }
    if password.is_empty() {
        return Err(SolaceError::Validation("password is required".to_string()).into());
    }
    Ok(())
}

/// Check registration input before it is sent
///
/// # Errors
///
/// Returns `SolaceError::Validation` if a field is blank, the email has no
/// `@`, or the two passwords differ
pub fn validate_registration(
    username: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<()> {
    validate_login(username, password)?;

    let email = email.trim();
    if email.is_empty() {
        return Err(SolaceError::Validation("email is required".to_string()).into());
    }
    if !email.contains('@') {
        return Err(
            SolaceError::Validation(format!("{} is not a valid email address", email)).into(),
        );
    }
    if password != confirm_password {
        return Err(SolaceError::Validation("passwords do not match".to_string()).into());
    }
    Ok(())
}

/// Authentication flows bound to a client and the token store
pub struct AuthSession {
    client: Arc<ApiClient>,
    store: Arc<dyn KeyValueStore>,
}

impl AuthSession {
    /// Create a session manager
    ///
    /// `store` must be the same store the client reads its token from.
    pub fn new(client: Arc<ApiClient>, store: Arc<dyn KeyValueStore>) -> Self {
        Self { client, store }
    }

    /// Whether a token is currently stored
    pub fn is_logged_in(&self) -> bool {
        self.client.token().is_some()
    }

    /// Log in and keep the returned token
    ///
    /// # Errors
    ///
    /// Returns `SolaceError::Validation` for blank input (no request made),
    /// `SolaceError::Authentication` when the backend refuses the
    /// credentials, or any transport error
    pub async fn login(&self, username: &str, password: &str) -> Result<Option<UserProfile>> {
        validate_login(username, password)?;

        let response = self
            .client
            .login(&Credentials {
                username: username.trim().to_string(),
                password: password.to_string(),
            })
            .await?;

        let user = self.accept(response, "Login failed, please check your credentials")?;
        tracing::info!(username = username.trim(), "Logged in");
        Ok(user)
    }

    /// Register an account
    ///
    /// If the backend returns a token the new account is logged in straight
    /// away.
    ///
    /// # Errors
    ///
    /// Returns `SolaceError::Validation` for invalid input (no request made)
    /// or `SolaceError::Authentication` when the backend rejects it
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<Option<UserProfile>> {
        validate_registration(username, email, password, confirm_password)?;

        let response = self
            .client
            .register(&Registration {
                username: username.trim().to_string(),
                password: password.to_string(),
                email: email.trim().to_string(),
            })
            .await?;

        if !response.success {
            return Err(SolaceError::Authentication(
                response
                    .message
                    .unwrap_or_else(|| "Registration failed".to_string()),
            )
            .into());
        }

        if let Some(token) = response.token.as_deref() {
            self.store.set(TOKEN_KEY, token)?;
        }
        tracing::info!(username = username.trim(), "Registered account");
        Ok(response.user)
    }

    /// Log out
    ///
    /// The backend is told on a best-effort basis; the local token is
    /// always removed.
    ///
    /// # Errors
    ///
    /// Returns error only if the local token cannot be removed
    pub async fn logout(&self) -> Result<()> {
        if self.is_logged_in() {
            if let Err(e) = self.client.logout().await {
                tracing::warn!(error = %e, "Backend logout failed, clearing local token anyway");
            }
        }
        self.store.remove(TOKEN_KEY)?;
        tracing::info!("Logged out");
        Ok(())
    }

    fn accept(&self, response: AuthResponse, fallback: &str) -> Result<Option<UserProfile>> {
        match (response.success, response.token) {
            (true, Some(token)) if !token.is_empty() => {
                self.store.set(TOKEN_KEY, &token)?;
                Ok(response.user)
            }
            _ => Err(SolaceError::Authentication(
                response.message.unwrap_or_else(|| fallback.to_string()),
            )
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_login_requires_both_fields() {
        assert!(validate_login("amy", "secret").is_ok());
        assert!(validate_login("  ", "secret").is_err());
        assert!(validate_login("amy", "").is_err());
    }

    #[test]
    fn test_validate_registration_password_mismatch() {
        let err = validate_registration("amy", "amy@example.org", "one", "two").unwrap_err();
        assert!(err.to_string().contains("passwords do not match"));
    }

    #[test]
    fn test_validate_registration_email() {
        assert!(validate_registration("amy", "", "pw", "pw").is_err());
        assert!(validate_registration("amy", "not-an-email", "pw", "pw").is_err());
        assert!(validate_registration("amy", "amy@example.org", "pw", "pw").is_ok());
    }

    #[test]
    fn test_validation_errors_are_typed() {
        let err = validate_login("", "").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SolaceError>(),
            Some(SolaceError::Validation(_))
        ));
    }
}
