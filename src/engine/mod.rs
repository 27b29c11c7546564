// src/engine/mod.rs

//! Dispatch and completion tracking.
//!
//! - [`flow`] is the controller: it owns the working graph, the tracked
//!   topologies and the worker pool, and exposes blocking and non-blocking
//!   dispatch plus bulk waits.
//! - [`topology`] is a dispatched graph with its done counter, completion
//!   signal and optional completion action.
//! - [`observer`] is the caller-side handle on a topology's outcome.
//! - [`outcome`] holds the failure records delivered through that handle.
//! - [`signal`] is the one-shot, multi-reader notification underneath.

pub mod flow;
pub mod observer;
pub mod outcome;
pub(crate) mod signal;
pub(crate) mod topology;

pub use flow::Flow;
pub use observer::Observer;
pub use outcome::{TaskFailure, TopologyOutcome};
pub use topology::CompletionAction;
