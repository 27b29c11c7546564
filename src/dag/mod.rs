// src/dag/mod.rs

//! DAG representation.
//!
//! - [`graph`] is the mutable graph callers build before dispatch, plus the
//!   [`TaskId`] handles it issues.
//! - [`node`] is the frozen, runtime form of a task inside a topology.
//! - [`shapes`] builds a few canned graph layouts.

pub mod graph;
pub(crate) mod node;
pub mod shapes;

pub use graph::{Graph, TaskId, Work};
