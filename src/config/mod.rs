// src/config/mod.rs

//! Configuration loading and validation for flowdag.
//!
//! - `model.rs` defines the TOML-backed data model.
//! - `loader.rs` reads a config file from disk.
//! - `validate.rs` checks the executor settings.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{ConfigFile, ExecutorConfig, RawConfigFile, WORKERS_ENV};
pub use validate::validate_executor;
