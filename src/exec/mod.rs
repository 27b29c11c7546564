// src/exec/mod.rs

//! Execution layer.
//!
//! - [`pool`] owns the worker threads and seeds dispatched topologies onto
//!   the shared ready-queue.
//! - [`worker`] is the per-thread loop: dequeue a ready task, run it, release
//!   its successors, and complete the topology if it was the last one.

pub mod pool;
pub(crate) mod worker;

pub use pool::WorkerPool;
