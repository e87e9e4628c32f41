//! Configuration module for dropslot.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::{DropError, Result};

/// Environment variable overriding `chat.token`.
pub const CHAT_TOKEN_ENV: &str = "DROPSLOT_CHAT_TOKEN";

/// Upload storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root directory holding one sub-directory per token.
    #[serde(default = "default_storage_path")]
    pub path: String,
    /// Maximum aggregate bytes across all stored uploads.
    #[serde(default = "default_max_storage_bytes")]
    pub max_storage_bytes: u64,
    /// Maximum size of a single upload in bytes.
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
    /// Seconds an entry lives (from creation) before it is reclaimed.
    #[serde(default = "default_retention_secs")]
    pub retention_secs: u64,
}

fn default_storage_path() -> String {
    "./storage".to_string()
}

fn default_max_storage_bytes() -> u64 {
    1 << 30 // 1 GiB
}

fn default_max_file_bytes() -> u64 {
    256 << 20 // 256 MiB
}

fn default_retention_secs() -> u64 {
    600 // 10 minutes
}

impl StorageConfig {
    /// Retention window as a `Duration`.
    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_secs)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            max_storage_bytes: default_max_storage_bytes(),
            max_file_bytes: default_max_file_bytes(),
            retention_secs: default_retention_secs(),
        }
    }
}

/// Web server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Host address to bind.
    #[serde(default = "default_web_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// Externally reachable base URL used to build upload and view links.
    #[serde(default = "default_public_url")]
    pub public_url: String,
    /// Rate limit for upload and slot creation endpoints (requests per minute per IP).
    #[serde(default = "default_upload_rate_limit")]
    pub upload_rate_limit: u32,
    /// Key the rate limit by `X-Forwarded-For`/`X-Real-IP`. Enable only
    /// behind a reverse proxy that sets them.
    #[serde(default)]
    pub trust_proxy_headers: bool,
}

fn default_web_host() -> String {
    "127.0.0.1".to_string()
}

fn default_web_port() -> u16 {
    8080
}

fn default_public_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_upload_rate_limit() -> u32 {
    30
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_web_host(),
            port: default_web_port(),
            public_url: default_public_url(),
            upload_rate_limit: default_upload_rate_limit(),
            trust_proxy_headers: false,
        }
    }
}

/// Chat bridge configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Chat server the bridge is attached to.
    #[serde(default = "default_chat_host")]
    pub host: String,
    /// Shared secret for the bridge. Required.
    #[serde(default)]
    pub token: String,
    /// Endpoint receiving outbound notifications. Empty means log only.
    #[serde(default)]
    pub webhook_url: String,
    /// Command name the bridge registers in the chat.
    #[serde(default = "default_chat_command")]
    pub command: String,
}

fn default_chat_host() -> String {
    "devzat.hackclub.com:5556".to_string()
}

fn default_chat_command() -> String {
    "devzatstagram".to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            host: default_chat_host(),
            token: String::new(),
            webhook_url: String::new(),
            command: default_chat_command(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file. Empty logs to the console only.
    #[serde(default = "default_log_file")]
    pub file: String,
    /// Log every HTTP request.
    #[serde(default)]
    pub access_log: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/dropslot.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
            access_log: false,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Web server configuration.
    #[serde(default)]
    pub web: WebConfig,
    /// Chat bridge configuration.
    #[serde(default)]
    pub chat: ChatConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(DropError::Io)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| DropError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `DROPSLOT_CHAT_TOKEN`: Override the chat bridge token
    pub fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var(CHAT_TOKEN_ENV) {
            if !token.is_empty() {
                self.chat.token = token;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - the chat token is not set
    /// - the storage quota, file limit or retention window is zero
    /// - the public URL does not parse
    pub fn validate(&self) -> Result<()> {
        if self.chat.token.is_empty() {
            return Err(DropError::Validation(format!(
                "chat.token is required. Set it in the config file or via {CHAT_TOKEN_ENV}."
            )));
        }
        if self.storage.max_storage_bytes == 0 {
            return Err(DropError::Validation(
                "storage.max_storage_bytes must be greater than zero".to_string(),
            ));
        }
        if self.storage.max_file_bytes == 0 {
            return Err(DropError::Validation(
                "storage.max_file_bytes must be greater than zero".to_string(),
            ));
        }
        if self.storage.retention_secs == 0 {
            return Err(DropError::Validation(
                "storage.retention_secs must be greater than zero".to_string(),
            ));
        }
        url::Url::parse(&self.web.public_url)
            .map_err(|e| DropError::Validation(format!("web.public_url is invalid: {e}")))?;
        Ok(())
    }
}
