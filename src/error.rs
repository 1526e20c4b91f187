//! Error types for Solace
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Solace operations
///
/// Covers configuration loading, local key-value storage, input validation,
/// and every failure mode of the remote backend.
#[derive(Error, Debug)]
pub enum SolaceError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local key-value storage errors (open, read, write, scan)
    #[error("Storage error: {0}")]
    Storage(String),

    /// A write would push the store past its byte quota
    #[error("Storage quota exceeded: limit={limit} bytes, requested={requested} bytes")]
    QuotaExceeded {
        /// Configured quota in bytes
        limit: usize,
        /// Total bytes the store would hold after the write
        requested: usize,
    },

    /// A stored record could not be decoded
    #[error("Corrupted record under key {key}: {message}")]
    CorruptedRecord {
        /// Storage key holding the record
        key: String,
        /// Decoder diagnostic
        message: String,
    },

    /// User input rejected before any request was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// Backend answered with a non-success status
    #[error("API error: status={status}, {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or backend message
        message: String,
    },

    /// Authentication errors (401 responses, rejected credentials)
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// A named record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP transport errors (connect, timeout, body decode)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for Solace operations
///
/// Uses `anyhow::Error` so call sites can attach context while still
/// downcasting to [`SolaceError`] where the variant matters.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = SolaceError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_storage_error_display() {
        let error = SolaceError::Storage("database connection failed".to_string());
        assert_eq!(
            error.to_string(),
            "Storage error: database connection failed"
        );
    }

    #[test]
    fn test_quota_exceeded_display() {
        let error = SolaceError::QuotaExceeded {
            limit: 64,
            requested: 100,
        };
        let s = error.to_string();
        assert!(s.contains("limit=64"));
        assert!(s.contains("requested=100"));
    }

    #[test]
    fn test_corrupted_record_display() {
        let error = SolaceError::CorruptedRecord {
            key: "chat_session_abc".to_string(),
            message: "missing field `messages`".to_string(),
        };
        assert!(error.to_string().contains("chat_session_abc"));
        assert!(error.to_string().contains("missing field"));
    }

    #[test]
    fn test_validation_error_display() {
        let error = SolaceError::Validation("message cannot be empty".to_string());
        assert_eq!(
            error.to_string(),
            "Validation error: message cannot be empty"
        );
    }

    #[test]
    fn test_not_found_display() {
        let error = SolaceError::NotFound("session abc".to_string());
        assert_eq!(error.to_string(), "Not found: session abc");
    }

    #[test]
    fn test_api_error_display() {
        let error = SolaceError::Api {
            status: 503,
            message: "LLM service unavailable".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "API error: status=503, LLM service unavailable"
        );
    }

    #[test]
    fn test_authentication_error_display() {
        let error = SolaceError::Authentication("token expired".to_string());
        assert_eq!(error.to_string(), "Authentication error: token expired");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: SolaceError = io_error.into();
        assert!(matches!(error, SolaceError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let error: SolaceError = json_error.into();
        assert!(matches!(error, SolaceError::Serialization(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: : yaml").unwrap_err();
        let error: SolaceError = yaml_error.into();
        assert!(matches!(error, SolaceError::Yaml(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SolaceError>();
    }
}
