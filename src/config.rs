//! Configuration module for the file service.

use serde::Deserialize;
use std::path::Path;

use crate::{FilesError, Result};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Shared volume configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Mount point of the shared volume, reported by `/api/info`.
    #[serde(default = "default_mount_path")]
    pub mount_path: String,
    /// Directory holding uploaded files.
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: String,
    /// Maximum upload size in megabytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
    /// Entries whose name starts with this prefix are not listed.
    #[serde(default = "default_hidden_prefix")]
    pub hidden_prefix: String,
}

fn default_mount_path() -> String {
    "/mnt/efs".to_string()
}

fn default_uploads_dir() -> String {
    "/mnt/efs/uploads".to_string()
}

fn default_max_upload_size() -> u64 {
    10
}

fn default_hidden_prefix() -> String {
    ".".to_string()
}

impl StorageConfig {
    /// Upload cap in bytes.
    pub fn max_upload_bytes(&self) -> usize {
        (self.max_upload_size_mb as usize).saturating_mul(1024 * 1024)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            mount_path: default_mount_path(),
            uploads_dir: default_uploads_dir(),
            max_upload_size_mb: default_max_upload_size(),
            hidden_prefix: default_hidden_prefix(),
        }
    }
}

/// Web configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Directory served under `/static`.
    #[serde(default = "default_static_path")]
    pub static_path: String,
    /// Mount `POST /api/crash`, which exits the process after a delay.
    #[serde(default)]
    pub crash_endpoint: bool,
    /// Delay before the crash endpoint exits the process.
    #[serde(default = "default_crash_delay")]
    pub crash_delay_secs: u64,
}

fn default_static_path() -> String {
    "static".to_string()
}

fn default_crash_delay() -> u64 {
    2
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            cors_origins: vec![],
            static_path: default_static_path(),
            crash_endpoint: false,
            crash_delay_secs: default_crash_delay(),
        }
    }
}

/// Task identity configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdentityConfig {
    /// Fixed task identifier. Resolved from the host when unset.
    #[serde(default)]
    pub task_id: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional log file. Unset means stdout only.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Shared volume configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Web configuration.
    #[serde(default)]
    pub web: WebConfig,
    /// Task identity configuration.
    #[serde(default)]
    pub identity: IdentityConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(FilesError::Io)?;
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
        toml::from_str(s).map_err(|e| FilesError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `EFS_FILES_UPLOADS_DIR`: uploads directory
    /// - `EFS_FILES_MOUNT_PATH`: reported mount path
    /// - `EFS_FILES_PORT`: listen port (ignored if not a valid port)
    /// - `EFS_FILES_TASK_ID`: fixed task identifier
    /// - `EFS_FILES_LOG_LEVEL`: log level
    /// - `EFS_FILES_LOG_FILE`: log file, in addition to stdout
    ///
    /// Empty values are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Some(dir) = non_empty_env("EFS_FILES_UPLOADS_DIR") {
            self.storage.uploads_dir = dir;
        }
        if let Some(mount) = non_empty_env("EFS_FILES_MOUNT_PATH") {
            self.storage.mount_path = mount;
        }
        if let Some(port) = non_empty_env("EFS_FILES_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid EFS_FILES_PORT: {}", port),
            }
        }
        if let Some(task_id) = non_empty_env("EFS_FILES_TASK_ID") {
            self.identity.task_id = Some(task_id);
        }
        if let Some(level) = non_empty_env("EFS_FILES_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(file) = non_empty_env("EFS_FILES_LOG_FILE") {
            self.logging.file = Some(file);
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - the upload cap is zero
    /// - the uploads directory is empty
    pub fn validate(&self) -> Result<()> {
        if self.storage.max_upload_size_mb == 0 {
            return Err(FilesError::Config(
                "max_upload_size_mb must be greater than zero".to_string(),
            ));
        }
        if self.storage.uploads_dir.trim().is_empty() {
            return Err(FilesError::Config("uploads_dir must be set".to_string()));
        }
        Ok(())
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
