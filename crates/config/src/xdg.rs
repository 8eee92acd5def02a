//! Per-user directories of teditor.
//!
//! On Linux these follow the XDG base directory layout; `dirs` picks the
//! platform equivalent elsewhere.

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_NAME: &str = "teditor";

fn app_dir(base: Option<PathBuf>, kind: &str) -> Result<PathBuf> {
    base.map(|p| p.join(APP_NAME))
        .with_context(|| format!("Failed to determine {} directory", kind))
}

/// Directory holding `config.toml`: `$XDG_CONFIG_HOME/teditor`.
pub fn config_dir() -> Result<PathBuf> {
    app_dir(dirs::config_dir(), "config")
}

/// Directory of the default log file: `$XDG_CACHE_HOME/teditor`.
pub fn cache_dir() -> Result<PathBuf> {
    app_dir(dirs::cache_dir(), "cache")
}
