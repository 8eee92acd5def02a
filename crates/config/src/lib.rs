//! Configuration management for teditor.
//!
//! This crate provides configuration loading, saving, and validation
//! with support for TOML format and XDG directory conventions.

mod settings;
mod xdg;

pub use settings::{Config, EditorSettings, LoggingSettings};
pub use xdg::{cache_dir, config_dir};

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Default values as constants
pub mod defaults {
    pub const TAB_SIZE: usize = 4;
    pub const PAGE_JUMP: f32 = 0.75;
    pub const WORD_CHARS: &str =
        "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_";
    pub const HISTORY_LIMIT: usize = 1000;
    pub const MIN_LOG_LEVEL: &str = "info";
    pub const MAX_LOG_ENTRIES: usize = 1000;
    pub const LOG_FILE_NAME: &str = "teditor.log";
    pub const LOG_LEVELS: [&str; 5] = ["debug", "info", "warn", "warning", "error"];
}

impl Config {
    /// Load configuration from the XDG config file.
    ///
    /// On first run, creates config file with default values.
    /// Auto-completes missing keys with default values.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Load configuration from `path`, creating it with defaults if missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run - create config file with default values
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let original_content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::validate_content(&original_content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        // Serialize back to get normalized content
        let normalized_content = toml::to_string_pretty(&config)?;

        // If content changed, save the updated config
        if original_content != normalized_content {
            log::info!("Normalizing config file {}", path.display());
            config.save_to(path)?;
        }

        Ok(config)
    }

    /// Save configuration to the XDG config file.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Save configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// Get path to config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(config_dir()?.join("config.toml"))
    }

    /// Parse and validate config content.
    pub fn validate_content(content: &str) -> Result<Config> {
        let config: Config = toml::from_str(content).map_err(|e| anyhow::anyhow!("{}", e))?;
        config.validate()?;
        Ok(config)
    }
}
