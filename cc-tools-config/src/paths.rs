//! XDG-compliant path resolution for cc-tools' persisted state.

use std::path::PathBuf;

use crate::error::ConfigError;

/// `${XDG_CONFIG_HOME:-$HOME/.config}/cc-tools`
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg).join("cc-tools"));
    }
    dirs::home_dir()
        .map(|home| home.join(".config").join("cc-tools"))
        .ok_or(ConfigError::NoConfigDir)
}

/// `${XDG_CACHE_HOME:-$HOME/.cache}/cc-tools`
pub fn cache_dir() -> Result<PathBuf, ConfigError> {
    if let Some(xdg) = std::env::var_os("XDG_CACHE_HOME") {
        return Ok(PathBuf::from(xdg).join("cc-tools"));
    }
    dirs::home_dir()
        .map(|home| home.join(".cache").join("cc-tools"))
        .ok_or(ConfigError::NoConfigDir)
}

pub fn config_file() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.json"))
}

pub fn skip_registry_file() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("skip-registry.json"))
}

/// The pre-cc-tools location this was migrated from, checked once on first
/// read of the skip registry if the new location does not yet exist.
pub fn legacy_skip_registry_file() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".claude").join("skip-registry.json"))
}

pub fn debug_log_dir() -> Result<PathBuf, ConfigError> {
    Ok(cache_dir()?.join("debug"))
}

pub fn cooldown_dir() -> Result<PathBuf, ConfigError> {
    Ok(cache_dir()?.join("cooldown"))
}
