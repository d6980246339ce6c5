//! Configuration module for Gazette.

use serde::Deserialize;
use std::path::Path;

use crate::ingest::{parse_schedule, DEFAULT_FEED_URL, DEFAULT_SCHEDULE};
use crate::{GazetteError, Result};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number for the API.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// JWT secret key (required).
    #[serde(default)]
    pub jwt_secret: String,
    /// Access token lifetime in seconds.
    #[serde(default = "default_jwt_expiry")]
    pub jwt_expiry_secs: u64,
    /// Whether the session cookie is marked `Secure`.
    #[serde(default)]
    pub cookie_secure: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_jwt_expiry() -> u64 {
    86400 // 1 day
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
            jwt_secret: String::new(),
            jwt_expiry_secs: default_jwt_expiry(),
            cookie_secure: false,
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/gazette.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/gazette.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Feed ingestion configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    /// Whether the ingestion job runs at all.
    #[serde(default = "default_ingest_enabled")]
    pub enabled: bool,
    /// Feed to ingest.
    #[serde(default = "default_feed_url")]
    pub feed_url: String,
    /// Five-field cron expression, evaluated in UTC.
    #[serde(default = "default_schedule")]
    pub schedule: String,
    /// Run one cycle before the API starts listening.
    #[serde(default = "default_run_on_startup")]
    pub run_on_startup: bool,
    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Read timeout in seconds.
    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,
    /// Total request timeout in seconds.
    #[serde(default = "default_total_timeout")]
    pub total_timeout_secs: u64,
    /// Maximum number of redirects.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    /// Maximum feed size in bytes.
    #[serde(default = "default_max_feed_size")]
    pub max_feed_size_bytes: u64,
    /// Maximum content snippet length in characters.
    #[serde(default = "default_max_content_length")]
    pub max_content_length: usize,
}

fn default_ingest_enabled() -> bool {
    true
}

fn default_feed_url() -> String {
    DEFAULT_FEED_URL.to_string()
}

fn default_schedule() -> String {
    DEFAULT_SCHEDULE.to_string()
}

fn default_run_on_startup() -> bool {
    true
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_read_timeout() -> u64 {
    20
}

fn default_total_timeout() -> u64 {
    30
}

fn default_max_redirects() -> usize {
    5
}

fn default_max_feed_size() -> u64 {
    5 * 1024 * 1024 // 5MB
}

fn default_max_content_length() -> usize {
    10000
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            enabled: default_ingest_enabled(),
            feed_url: default_feed_url(),
            schedule: default_schedule(),
            run_on_startup: default_run_on_startup(),
            connect_timeout_secs: default_connect_timeout(),
            read_timeout_secs: default_read_timeout(),
            total_timeout_secs: default_total_timeout(),
            max_redirects: default_max_redirects(),
            max_feed_size_bytes: default_max_feed_size(),
            max_content_length: default_max_content_length(),
        }
    }
}

/// Bootstrap administrator account, created at startup when missing.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    /// Login username.
    pub username: String,
    /// Login email.
    pub email: String,
    /// Plain-text password (hashed before storage).
    pub password: String,
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Feed ingestion configuration.
    #[serde(default)]
    pub ingest: IngestConfig,
    /// Optional bootstrap administrator.
    #[serde(default)]
    pub admin: Option<AdminConfig>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(GazetteError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| GazetteError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `GAZETTE_JWT_SECRET`: JWT secret key
    /// - `GAZETTE_DATABASE_PATH`: SQLite database path
    /// - `GAZETTE_FEED_URL`: feed to ingest
    pub fn apply_env_overrides(&mut self) {
        if let Some(value) = non_empty_env("GAZETTE_JWT_SECRET") {
            self.server.jwt_secret = value;
        }
        if let Some(value) = non_empty_env("GAZETTE_DATABASE_PATH") {
            self.database.path = value;
        }
        if let Some(value) = non_empty_env("GAZETTE_FEED_URL") {
            self.ingest.feed_url = value;
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - the JWT secret is not set
    /// - ingestion is enabled with an unparseable schedule
    /// - ingestion is enabled with a feed URL that is not http(s)
    pub fn validate(&self) -> Result<()> {
        if self.server.jwt_secret.is_empty() {
            return Err(GazetteError::Config(
                "jwt_secret is not set. \
                 Set it in config.toml or via GAZETTE_JWT_SECRET environment variable."
                    .to_string(),
            ));
        }

        if self.ingest.enabled {
            parse_schedule(&self.ingest.schedule)?;

            let parsed = url::Url::parse(&self.ingest.feed_url)
                .map_err(|e| GazetteError::Config(format!("invalid feed_url: {e}")))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(GazetteError::Config(format!(
                    "unsupported feed_url scheme: {}",
                    parsed.scheme()
                )));
            }
        }

        Ok(())
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
