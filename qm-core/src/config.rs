//! Application configuration management.
//!
//! Handles loading, saving, and accessing application configuration:
//! discovery feed paging, invite behaviour, and logging. Configuration
//! is persisted as TOML on disk.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{QmError, QmResult};
use crate::platform::Platform;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Discovery feed settings.
    #[serde(default)]
    pub feed: FeedConfig,

    /// Invite behaviour settings.
    #[serde(default)]
    pub invites: InviteConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for log files. If empty, uses default location.
    #[serde(default)]
    pub directory: String,

    /// Enable JSON structured logging output.
    #[serde(default)]
    pub json_output: bool,
}

/// Discovery feed configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Number of records requested per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// How many rows before the end of the list the shell should ask for more.
    #[serde(default = "default_prefetch_threshold")]
    pub prefetch_threshold: u32,
}

/// Invite behaviour configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InviteConfig {
    /// Refresh the discovery feed after a new invite is recorded.
    #[serde(default = "default_true")]
    pub refresh_after_invite: bool,

    /// Emit a confirmation event when a new invite is recorded.
    #[serde(default = "default_true")]
    pub confirm_new_invites: bool,
}

// Default value functions for serde

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_page_size() -> u32 {
    constants::DEFAULT_FEED_PAGE_SIZE
}

fn default_prefetch_threshold() -> u32 {
    constants::DEFAULT_PREFETCH_THRESHOLD
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: String::new(),
            json_output: false,
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            prefetch_threshold: default_prefetch_threshold(),
        }
    }
}

impl Default for InviteConfig {
    fn default() -> Self {
        Self {
            refresh_after_invite: true,
            confirm_new_invites: true,
        }
    }
}

impl LoggingConfig {
    /// The configured log directory, or the platform default when empty.
    pub fn effective_dir(&self) -> QmResult<PathBuf> {
        if self.directory.is_empty() {
            Platform::log_dir()
        } else {
            Ok(PathBuf::from(&self.directory))
        }
    }
}

impl FeedConfig {
    /// Page size, rejecting zero.
    pub fn validated_page_size(&self) -> QmResult<u32> {
        if self.page_size == 0 {
            return Err(QmError::Config("feed.page_size must be greater than zero".into()));
        }
        Ok(self.page_size)
    }
}

impl AppConfig {
    /// Load configuration from the default config file path.
    pub fn load_default() -> QmResult<Self> {
        let path = Self::default_config_path()?;
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &Path) -> QmResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a specific file path.
    pub fn save_to_file(&self, path: &Path) -> QmResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| QmError::Config(format!("failed to serialize config: {e}")))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> QmResult<PathBuf> {
        Ok(Platform::config_dir()?.join("config.toml"))
    }
}

/// Thread-safe configuration holder for shared access across services.
#[derive(Clone)]
pub struct ConfigHandle {
    inner: Arc<RwLock<AppConfig>>,
}

impl ConfigHandle {
    /// Create a new configuration handle.
    pub fn new(config: AppConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Read the configuration.
    pub async fn read(&self) -> tokio::sync::RwLockReadGuard<'_, AppConfig> {
        self.inner.read().await
    }

    /// Write/update the configuration.
    pub async fn write(&self) -> tokio::sync::RwLockWriteGuard<'_, AppConfig> {
        self.inner.write().await
    }
}
