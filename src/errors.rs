// src/errors.rs

//! Crate-wide error type and helpers.

use thiserror::Error;

use crate::dag::TaskId;
use crate::engine::TaskFailure;

#[derive(Error, Debug)]
pub enum FlowdagError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// `precede(from, to)` would close a cycle through `to -> ... -> from`.
    #[error("Cycle detected in graph: edge {from} -> {to} would close a cycle")]
    Cycle { from: TaskId, to: TaskId },

    #[error("Task {0} cannot precede itself")]
    SelfLoop(TaskId),

    /// The handle was issued by a different graph (typically one that has
    /// already been dispatched).
    #[error("Task {0} does not belong to this graph")]
    ForeignTask(TaskId),

    /// First failure recorded by a topology; `total` counts every failed task.
    #[error("{failure} ({total} task(s) failed in topology {topology})")]
    TaskFailed {
        topology: u64,
        failure: TaskFailure,
        total: usize,
    },

    #[error("Worker pool error: {0}")]
    PoolError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, FlowdagError>;
