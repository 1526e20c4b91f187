//! Configuration management for Solace
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{Result, SolaceError};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for Solace
///
/// Holds the backend connection settings, the local session store settings,
/// and the chat controller's canned messages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote backend settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Local key-value store settings
    #[serde(default)]
    pub storage: StorageConfig,
    /// Chat controller settings
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Remote backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the chat endpoint (`/chat` or `/chat/send` depending on the backend)
    #[serde(default = "default_chat_path")]
    pub chat_path: String,

    /// Request timeout in seconds (LLM replies can be slow)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_chat_path() -> String {
    "/chat".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            chat_path: default_chat_path(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Backend used for the local key-value store
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Durable on-disk store
    #[default]
    Sled,
    /// Process-local map, discarded on exit
    Memory,
}

impl StorageBackend {
    /// Parse a backend name as accepted in config files and env vars
    pub fn parse_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sled" => Ok(Self::Sled),
            "memory" => Ok(Self::Memory),
            other => Err(SolaceError::Config(format!(
                "Invalid storage backend: {}. Must be one of: sled, memory",
                other
            ))
            .into()),
        }
    }
}

/// Local key-value store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Which backend holds sessions and the auth token
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory of the sled database; defaults to the platform data dir
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Namespace prefix for session keys
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

fn default_key_prefix() -> String {
    crate::session::DEFAULT_KEY_PREFIX.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: None,
            key_prefix: default_key_prefix(),
        }
    }
}

impl StorageConfig {
    /// Resolve the on-disk location of the store
    ///
    /// # Errors
    ///
    /// Returns error if no path is configured and the platform data
    /// directory cannot be determined
    pub fn resolve_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }

        let proj_dirs = ProjectDirs::from("com", "solace", "solace")
            .ok_or_else(|| SolaceError::Storage("Could not determine data directory".into()))?;

        Ok(proj_dirs.data_dir().join("store"))
    }
}

/// Chat controller configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Assistant message that opens every new session
    #[serde(default = "default_welcome_message")]
    pub welcome_message: String,

    /// Assistant message appended when the backend cannot be reached
    #[serde(default = "default_apology_message")]
    pub apology_message: String,
}

fn default_welcome_message() -> String {
    "Hello, I'm here to listen. How are you feeling today?".to_string()
}

fn default_apology_message() -> String {
    "Sorry, I couldn't reach the assistant just now. Please try again in a moment.".to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            welcome_message: default_welcome_message(),
            apology_message: default_apology_message(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SolaceError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| SolaceError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var("SOLACE_API_BASE_URL") {
            self.api.base_url = base_url;
        }

        if let Ok(chat_path) = std::env::var("SOLACE_CHAT_PATH") {
            self.api.chat_path = chat_path;
        }

        if let Ok(timeout) = std::env::var("SOLACE_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.api.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid SOLACE_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(backend) = std::env::var("SOLACE_STORAGE_BACKEND") {
            match StorageBackend::parse_str(&backend) {
                Ok(b) => {
                    self.storage.backend = b;
                    tracing::debug!(backend = ?b, "Env override: SOLACE_STORAGE_BACKEND");
                }
                Err(_) => tracing::warn!("Invalid SOLACE_STORAGE_BACKEND: {}", backend),
            }
        }

        if let Ok(path) = std::env::var("SOLACE_STORAGE_PATH") {
            tracing::debug!(path = %path, "Env override: SOLACE_STORAGE_PATH");
            self.storage.path = Some(PathBuf::from(path));
        }

        if let Ok(prefix) = std::env::var("SOLACE_KEY_PREFIX") {
            self.storage.key_prefix = prefix;
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let Some(path) = &cli.storage_path {
            tracing::info!("Using storage path override from CLI: {}", path.display());
            self.storage.path = Some(path.clone());
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is empty or unparsable, the timeout is
    /// zero, or the key prefix is empty
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(SolaceError::Config("api.base_url cannot be empty".to_string()).into());
        }

        let parsed = url::Url::parse(&self.api.base_url).map_err(|e| {
            SolaceError::Config(format!(
                "api.base_url is not a valid URL ({}): {}",
                self.api.base_url, e
            ))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SolaceError::Config(format!(
                "api.base_url must use http or https, got {}",
                parsed.scheme()
            ))
            .into());
        }

        if !self.api.chat_path.starts_with('/') {
            return Err(
                SolaceError::Config("api.chat_path must start with '/'".to_string()).into(),
            );
        }

        if self.api.timeout_seconds == 0 {
            return Err(SolaceError::Config(
                "api.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.storage.key_prefix.is_empty() {
            return Err(
                SolaceError::Config("storage.key_prefix cannot be empty".to_string()).into(),
            );
        }

        Ok(())
    }
}
