// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{ConfigFile, RawConfigFile, WORKERS_ENV, parse_workers};
use crate::errors::Result;

/// Load a configuration file and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; use [`load_and_validate`] for
/// the checked form.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file, apply the `FLOWDAG_WORKERS` override, and
/// validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let mut raw_config = load_from_path(&path)?;
    if let Ok(raw) = std::env::var(WORKERS_ENV) {
        raw_config.executor.workers = parse_workers(&raw)?;
    }
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// `Flowdag.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Flowdag.toml")
}
