// src/engine/outcome.rs

//! Failure records and the final outcome of a topology.

use std::fmt;

use crate::dag::TaskId;
use crate::errors::{FlowdagError, Result};

/// One task that did not complete normally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFailure {
    pub task: TaskId,
    pub name: Option<String>,
    pub message: String,
    /// `true` if the payload panicked rather than returning `Err`.
    pub panicked: bool,
}

impl fmt::Display for TaskFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "task '{}' ({})", name, self.task)?,
            None => write!(f, "task {}", self.task)?,
        }
        if self.panicked {
            write!(f, " panicked: {}", self.message)
        } else {
            write!(f, " failed: {}", self.message)
        }
    }
}

impl std::error::Error for TaskFailure {}

/// Final outcome of a topology, as delivered by its completion signal.
///
/// Every failure is kept, in the order workers observed them; the first one
/// is the one reported through [`into_result`](Self::into_result).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologyOutcome {
    pub topology: u64,
    pub failures: Vec<TaskFailure>,
}

impl TopologyOutcome {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn first_failure(&self) -> Option<&TaskFailure> {
        self.failures.first()
    }

    pub fn into_result(self) -> Result<()> {
        let total = self.failures.len();
        match self.failures.into_iter().next() {
            None => Ok(()),
            Some(failure) => Err(FlowdagError::TaskFailed {
                topology: self.topology,
                failure,
                total,
            }),
        }
    }
}
