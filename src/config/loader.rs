// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{RawSchedulerConfig, SchedulerConfig};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw
/// `RawSchedulerConfig`.
///
/// This only performs TOML deserialization; it does **not** parse the
/// policy/level strings. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawSchedulerConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawSchedulerConfig = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it.
///
/// This is the recommended entry point for embedding hosts.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<SchedulerConfig> {
    let raw_config = load_from_path(&path)?;
    let config = SchedulerConfig::try_from(raw_config)?;
    Ok(config)
}

/// Default config location: `Taskdag.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Taskdag.toml")
}
