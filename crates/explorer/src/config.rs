//! Configuration management for the explorer.
//!
//! This module provides TOML-based configuration file loading and saving.
//! The default configuration path is `~/.config/explorer/config.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::files::{Aliases, PatternLists};

/// Configuration validation errors.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("root directory does not exist: {0}")]
    RootNotFound(PathBuf),

    #[error("root is not a directory: {0}")]
    RootNotDirectory(PathBuf),

    #[error("default_page_size must be between 1 and max_page_size ({max}), got {value}")]
    InvalidDefaultPageSize { value: usize, max: usize },

    #[error("max_page_size must be greater than 0, got {0}")]
    InvalidMaxPageSize(usize),

    #[error("log_level must be one of: trace, debug, info, warn, error; got {0}")]
    InvalidLogLevel(String),
}

/// Valid log level values for tracing configuration.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Main configuration structure for the explorer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    /// Log output settings.
    pub logging: LoggingConfig,

    /// Root directory settings.
    pub explorer: ExplorerConfig,

    /// Ignore/allow wildcard lists.
    pub patterns: PatternLists,

    /// Directory name to display name.
    pub aliases: Aliases,

    /// Pagination and scan bounds.
    pub listing: ListingConfig,
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    pub log_level: String,
}

/// Root directory settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Directory clients may browse.
    pub root_path: PathBuf,

    /// Preferred root. Used instead of `root_path` when it is set and is an
    /// existing directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files_directory: Option<PathBuf>,
}

/// Pagination and scan bounds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ListingConfig {
    /// Page size when a request does not name one.
    pub default_page_size: usize,

    /// Largest page size a client may request.
    pub max_page_size: usize,

    /// Children examined per directory scan (0 = unbounded).
    pub max_entries: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            root_path: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            files_directory: None,
        }
    }
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            default_page_size: protocol::DEFAULT_PAGE_SIZE as usize,
            max_page_size: 500,
            max_entries: 10_000,
        }
    }
}

/// Returns the default configuration file path.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("explorer")
        .join("config.toml")
}

impl Config {
    /// The directory listings are confined to.
    ///
    /// `files_directory` wins when it names an existing directory; otherwise
    /// `root_path` is used.
    pub fn effective_root(&self) -> PathBuf {
        match &self.explorer.files_directory {
            Some(dir) if dir.is_dir() => dir.clone(),
            _ => self.explorer.root_path.clone(),
        }
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Environment variables take precedence over config file values.
    /// Supported variables:
    /// - EXPLORER_ROOT: Override the root directory (also clears files_directory)
    /// - EXPLORER_LOG_LEVEL: Override log level (trace, debug, info, warn, error)
    pub fn apply_env_overrides(&mut self) {
        if let Ok(root) = std::env::var("EXPLORER_ROOT") {
            if !root.is_empty() {
                tracing::info!("Overriding root_path from environment: {}", root);
                self.explorer.root_path = PathBuf::from(root);
                self.explorer.files_directory = None;
            }
        }

        if let Ok(level) = std::env::var("EXPLORER_LOG_LEVEL") {
            if !level.is_empty() {
                tracing::info!("Overriding log_level from environment: {}", level);
                self.logging.log_level = level;
            }
        }
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let root = self.effective_root();
        if !root.exists() {
            return Err(ConfigError::RootNotFound(root));
        }
        if !root.is_dir() {
            return Err(ConfigError::RootNotDirectory(root));
        }

        if self.listing.max_page_size == 0 {
            return Err(ConfigError::InvalidMaxPageSize(self.listing.max_page_size));
        }

        if self.listing.default_page_size == 0
            || self.listing.default_page_size > self.listing.max_page_size
        {
            return Err(ConfigError::InvalidDefaultPageSize {
                value: self.listing.default_page_size,
                max: self.listing.max_page_size,
            });
        }

        let level = self.logging.log_level.to_lowercase();
        if !VALID_LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(self.logging.log_level.clone()));
        }

        Ok(())
    }

    /// Load configuration from a file.
    ///
    /// If the file does not exist, returns the default configuration.
    /// If the file exists but is invalid TOML, returns an error with
    /// a helpful message.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self> {
        Self::load(default_config_path())
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str)
            .map_err(|e| anyhow::anyhow!("Invalid TOML configuration: {}", format_toml_error(&e)))
    }

    /// Save configuration to a file.
    ///
    /// Creates parent directories if they don't exist.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = self.to_toml()?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::debug!("Configuration saved to {:?}", path);
        Ok(())
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")
    }
}

/// Format a TOML deserialization error for user-friendly display.
fn format_toml_error(error: &toml::de::Error) -> String {
    let mut msg = error.message().to_string();

    if let Some(span) = error.span() {
        msg.push_str(&format!(" (at position {}..{})", span.start, span.end));
    }

    msg
}
