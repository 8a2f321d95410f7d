// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{Config, RawConfigFile};
use crate::errors::{Result, ShellwrapError};

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "SHELLWRAP_CONFIG";

/// Load a configuration file and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; use [`load_and_validate`] for
/// semantic checks.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| {
        ShellwrapError::Config(format!("cannot read {}: {}", path.display(), e))
    })?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file and validate it.
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks profiles for empty binaries and every duration for parseability.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<Config> {
    let raw_config = load_from_path(&path)?;
    Config::try_from(raw_config)
}

/// `SHELLWRAP_CONFIG` if set, otherwise `shellwrap.toml` in the current
/// directory.
pub fn default_config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("shellwrap.toml"))
}
