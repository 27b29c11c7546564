// src/types.rs

//! Small state enums shared by the graph, the worker pool and the engine.

use std::fmt;

/// Runtime state of a single task node inside a dispatched topology.
///
/// Transitions are strictly forward:
/// `Pending -> Ready -> Running -> Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum TaskState {
    /// Waiting for at least one predecessor.
    Pending = 0,
    /// All predecessors are done; queued for a worker.
    Ready = 1,
    /// Claimed by a worker and executing.
    Running = 2,
    /// Finished, successfully or with a recorded failure.
    Done = 3,
}

impl TaskState {
    pub(crate) fn from_u8(raw: u8) -> Self {
        match raw {
            0 => TaskState::Pending,
            1 => TaskState::Ready,
            2 => TaskState::Running,
            _ => TaskState::Done,
        }
    }
}

/// Lifecycle of a dispatched topology. `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologyStatus {
    Active,
    Completed,
}

impl fmt::Display for TopologyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopologyStatus::Active => f.write_str("active"),
            TopologyStatus::Completed => f.write_str("completed"),
        }
    }
}

/// Synthetic graph shapes run by the demo binary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum GraphShape {
    /// `t0 -> t1 -> ... -> tN`
    Chain,
    /// One source fanning out to `width` tasks that join into one sink.
    #[default]
    Fan,
    /// Layers of `width` tasks, every task depending on the whole previous layer.
    Diamond,
}
