// src/config/model.rs

use serde::Deserialize;

use crate::errors::{FlowdagError, Result};

/// Environment variable overriding the worker count.
pub const WORKERS_ENV: &str = "FLOWDAG_WORKERS";

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [executor]
/// workers = 4
/// thread_name = "flowdag-worker"
/// ```
///
/// Every section and key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub executor: ExecutorConfig,
}

/// Validated configuration. Build it with `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub executor: ExecutorConfig,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(executor: ExecutorConfig) -> Self {
        Self { executor }
    }
}

/// `[executor]` section: how the worker pool is built.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExecutorConfig {
    /// Number of worker threads. Defaults to the number of logical CPUs.
    ///
    /// Payloads that block on another topology hold their worker for the
    /// whole wait, so size this with such waits in mind.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Worker threads are named `<thread_name>-<index>`.
    #[serde(default = "default_thread_name")]
    pub thread_name: String,
}

fn default_workers() -> usize {
    num_cpus::get().max(1)
}

fn default_thread_name() -> String {
    "flowdag-worker".to_string()
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            thread_name: default_thread_name(),
        }
    }
}

impl ExecutorConfig {
    /// Defaults, with `FLOWDAG_WORKERS` applied if it is set.
    pub fn from_env() -> Result<Self> {
        let mut cfg = Self::default();
        if let Ok(raw) = std::env::var(WORKERS_ENV) {
            cfg.workers = parse_workers(&raw)?;
        }
        Ok(cfg)
    }
}

pub(crate) fn parse_workers(raw: &str) -> Result<usize> {
    raw.trim().parse::<usize>().map_err(|e| {
        FlowdagError::ConfigError(format!(
            "{WORKERS_ENV} must be a positive integer (got {raw:?}: {e})"
        ))
    })
}
