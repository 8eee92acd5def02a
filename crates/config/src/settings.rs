//! Configuration structures for teditor settings.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::{cache_dir, defaults};

/// Application configuration with nested sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Editor settings
    #[serde(default)]
    pub editor: EditorSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Editor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorSettings {
    /// Tab size (number of spaces)
    #[serde(default = "default_tab_size")]
    pub tab_size: usize,

    /// Fraction of the view height moved by page up/down
    #[serde(default = "default_page_jump")]
    pub page_jump: f32,

    /// Characters that form words for word motions
    #[serde(default = "default_word_chars")]
    pub word_chars: String,

    /// Maximum number of undo steps kept per buffer (0 = unbounded)
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log file path (optional)
    #[serde(default)]
    pub file_path: Option<String>,

    /// Minimum log level (debug, info, warn, error)
    #[serde(default = "default_min_level")]
    pub min_level: String,

    /// Number of recent log entries kept in memory
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

impl EditorSettings {
    /// Rows moved by a page motion in a view `height` rows tall, at least 1.
    pub fn page_rows(&self, height: usize) -> usize {
        ((self.page_jump * height as f32) as usize).max(1)
    }

    fn validate(&self) -> Result<()> {
        if self.tab_size == 0 {
            bail!("editor.tab_size must be at least 1");
        }
        if !(self.page_jump > 0.0 && self.page_jump <= 1.0) {
            bail!(
                "editor.page_jump must be in (0, 1], got {}",
                self.page_jump
            );
        }
        if self.word_chars.contains('\n') {
            bail!("editor.word_chars must not contain a newline");
        }
        Ok(())
    }
}

impl LoggingSettings {
    /// Configured log file, or `teditor.log` in the cache directory.
    pub fn resolved_file_path(&self) -> Result<PathBuf> {
        match &self.file_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => Ok(cache_dir()?.join(defaults::LOG_FILE_NAME)),
        }
    }

    fn validate(&self) -> Result<()> {
        if !defaults::LOG_LEVELS.contains(&self.min_level.to_lowercase().as_str()) {
            bail!("logging.min_level: unknown log level '{}'", self.min_level);
        }
        Ok(())
    }
}

impl Config {
    /// Check value ranges that serde alone cannot express.
    pub fn validate(&self) -> Result<()> {
        self.editor.validate()?;
        self.logging.validate()
    }
}

// Default value functions for serde
fn default_tab_size() -> usize {
    defaults::TAB_SIZE
}

fn default_page_jump() -> f32 {
    defaults::PAGE_JUMP
}

fn default_word_chars() -> String {
    defaults::WORD_CHARS.to_string()
}

fn default_history_limit() -> usize {
    defaults::HISTORY_LIMIT
}

fn default_min_level() -> String {
    defaults::MIN_LOG_LEVEL.to_string()
}

fn default_max_entries() -> usize {
    defaults::MAX_LOG_ENTRIES
}

// Default implementations
impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            tab_size: default_tab_size(),
            page_jump: default_page_jump(),
            word_chars: default_word_chars(),
            history_limit: default_history_limit(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file_path: None,
            min_level: default_min_level(),
            max_entries: default_max_entries(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());

        let config: Config = toml::from_str("[editor]\ntab_size = 2\n").unwrap();
        assert_eq!(config.editor.tab_size, 2);
        assert_eq!(config.editor.page_jump, defaults::PAGE_JUMP);
        assert_eq!(config.logging.min_level, "info");
    }

    #[test]
    fn test_page_rows() {
        let settings = EditorSettings::default();
        assert_eq!(settings.page_rows(40), 30);
        assert_eq!(settings.page_rows(1), 1);
        assert_eq!(settings.page_rows(0), 1);
    }

    #[test]
    fn test_validate() {
        assert!(Config::default().validate().is_ok());

        let mut config = Config::default();
        config.editor.page_jump = 1.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.editor.tab_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.min_level = "verbose".to_string();
        assert!(config.validate().is_err());
        config.logging.min_level = "WARN".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_explicit_log_path() {
        let logging = LoggingSettings {
            file_path: Some("/tmp/custom.log".to_string()),
            ..Default::default()
        };
        assert_eq!(
            logging.resolved_file_path().unwrap(),
            PathBuf::from("/tmp/custom.log")
        );
    }
}
