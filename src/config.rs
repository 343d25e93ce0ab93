//! todo-summary configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::llm::LlmError;

/// Main todo-summary configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Todo storage configuration
    pub storage: StorageConfig,

    /// Completion provider configuration
    pub llm: LlmConfig,

    /// Chat webhook configuration
    pub notify: NotifyConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Call this early in startup to fail fast with clear error messages.
    /// A missing completion key is not an error: summaries fall back to the
    /// template instead.
    pub fn validate(&self) -> Result<()> {
        if self.storage.is_hosted() && self.storage.api_key.as_deref().is_none_or(str::is_empty) {
            return Err(eyre::eyre!(
                "Hosted storage needs an API key. Set storage.api-key or the SUPABASE_KEY environment variable."
            ));
        }
        if self.notify.webhook_url.as_deref().is_none_or(str::is_empty) {
            return Err(eyre::eyre!(
                "Webhook URL not found. Set notify.webhook-url or the SLACK_WEBHOOK_URL environment variable."
            ));
        }
        Ok(())
    }

    /// Load configuration with fallback chain, then apply environment overrides
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let mut config = Self::load_file(config_path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn load_file(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: ./todo-summary.yml
        let local_config = PathBuf::from("todo-summary.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/todo-summary/todo-summary.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("todo-summary").join("todo-summary.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Override file values with the deployment environment
    ///
    /// `lookup` is `std::env::var` in production; tests pass a map.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = lookup("SUPABASE_URL") {
            self.storage.url = Some(url);
        }
        if let Some(key) = lookup("SUPABASE_KEY") {
            self.storage.api_key = Some(key);
        }
        if let Some(path) = lookup("DATABASE_PATH") {
            self.storage.sqlite_path = PathBuf::from(path);
        }
        if let Some(url) = lookup("SLACK_WEBHOOK_URL") {
            self.notify.webhook_url = Some(url);
        }
        if let Some(port) = lookup("PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!(%port, "Ignoring invalid PORT"),
            }
        }
        if let Some(mode) = lookup("RUN_MODE") {
            self.server.mode = mode;
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Run mode; "production" serves the frontend bundle
    pub mode: String,

    /// Directory holding the built frontend bundle
    #[serde(rename = "static-dir")]
    pub static_dir: PathBuf,
}

impl ServerConfig {
    pub fn serves_static(&self) -> bool {
        self.mode == "production"
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            mode: "development".to_string(),
            static_dir: PathBuf::from("frontend/dist"),
        }
    }
}

/// Todo storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Hosted PostgREST base URL; when set the hosted backend is used
    pub url: Option<String>,

    /// Hosted API key
    #[serde(rename = "api-key")]
    pub api_key: Option<String>,

    /// SQLite database file for the local backend
    #[serde(rename = "sqlite-path")]
    pub sqlite_path: PathBuf,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Retries for idempotent reads against the hosted backend
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Initial retry backoff in milliseconds, doubled per attempt
    #[serde(rename = "retry-backoff-ms")]
    pub retry_backoff_ms: u64,
}

impl StorageConfig {
    pub fn is_hosted(&self) -> bool {
        self.url.as_deref().is_some_and(|u| !u.is_empty())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let sqlite_path = dirs::data_local_dir()
            .map(|d| d.join("todo-summary").join("todos.db"))
            .unwrap_or_else(|| PathBuf::from("todos.db"));
        Self {
            url: None,
            api_key: None,
            sqlite_path,
            timeout_ms: 10_000,
            max_retries: 2,
            retry_backoff_ms: 200,
        }
    }
}

/// Completion provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name ("openai" or "anthropic")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl LlmConfig {
    /// Read the API key from the configured environment variable
    pub fn get_api_key(&self) -> Result<String, LlmError> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(LlmError::MissingApiKey(self.api_key_env.clone())),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            base_url: "https://api.openai.com".to_string(),
            max_tokens: 500,
            timeout_ms: 30_000,
        }
    }
}

/// Chat webhook configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Incoming-webhook URL
    #[serde(rename = "webhook-url")]
    pub webhook_url: Option<String>,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_ms: 10_000,
        }
    }
}
