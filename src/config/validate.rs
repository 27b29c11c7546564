// src/config/validate.rs

use crate::config::model::{ConfigFile, ExecutorConfig, RawConfigFile};
use crate::errors::{FlowdagError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::FlowdagError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_executor(&raw.executor)?;
        Ok(ConfigFile::new_unchecked(raw.executor))
    }
}

/// Check the invariants the worker pool relies on.
pub fn validate_executor(cfg: &ExecutorConfig) -> Result<()> {
    if cfg.workers == 0 {
        return Err(FlowdagError::ConfigError(
            "[executor].workers must be >= 1 (got 0)".to_string(),
        ));
    }

    if cfg.thread_name.trim().is_empty() {
        return Err(FlowdagError::ConfigError(
            "[executor].thread_name must not be empty".to_string(),
        ));
    }

    if cfg.thread_name.contains('\0') {
        return Err(FlowdagError::ConfigError(
            "[executor].thread_name must not contain NUL bytes".to_string(),
        ));
    }

    Ok(())
}
