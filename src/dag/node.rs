// src/dag/node.rs

//! Runtime task node: one frozen payload plus its precedence bookkeeping.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use tracing::warn;

use crate::dag::graph::Work;
use crate::types::TaskState;

/// Why a payload did not complete normally.
#[derive(Debug)]
pub(crate) enum InvokeError {
    /// The payload returned `Err`.
    Failed(anyhow::Error),
    /// The payload panicked; the panic was caught on the worker.
    Panicked(String),
}

/// A task node owned by a dispatched topology.
///
/// The payload stays inside the node after it has run, so anything it
/// captured lives until the owning topology is reclaimed.
pub(crate) struct Node {
    name: Option<String>,
    work: Mutex<Option<Work>>,
    successors: Vec<usize>,
    num_predecessors: usize,
    /// Unsatisfied predecessors; the node is ready once this hits zero.
    join_counter: AtomicUsize,
    state: AtomicU8,
}

impl Node {
    pub(crate) fn new(
        name: Option<String>,
        work: Work,
        successors: Vec<usize>,
        num_predecessors: usize,
    ) -> Self {
        Self {
            name,
            work: Mutex::new(Some(work)),
            successors,
            num_predecessors,
            join_counter: AtomicUsize::new(num_predecessors),
            state: AtomicU8::new(TaskState::Pending as u8),
        }
    }

    pub(crate) fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub(crate) fn is_root(&self) -> bool {
        self.num_predecessors == 0
    }

    pub(crate) fn successors(&self) -> &[usize] {
        &self.successors
    }

    pub(crate) fn state(&self) -> TaskState {
        TaskState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub(crate) fn set_state(&self, state: TaskState) {
        self.state.store(state as u8, Ordering::Release);
    }

    /// Record that one predecessor finished.
    ///
    /// Returns `true` for exactly one caller: the one whose decrement takes
    /// the join counter from one to zero.
    pub(crate) fn release_one(&self) -> bool {
        self.join_counter.fetch_sub(1, Ordering::AcqRel) == 1
    }

    /// Run the payload, catching both returned errors and panics.
    pub(crate) fn invoke(&self) -> Result<(), InvokeError> {
        let mut guard = self.work.lock().unwrap_or_else(PoisonError::into_inner);

        let Some(work) = guard.as_mut() else {
            warn!(task = ?self.name, "payload already reclaimed; skipping invocation");
            return Ok(());
        };

        match panic::catch_unwind(AssertUnwindSafe(|| work())) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(InvokeError::Failed(err)),
            Err(payload) => Err(InvokeError::Panicked(panic_message(payload.as_ref()))),
        }
    }

    /// Drop the payload (and everything it captured).
    pub(crate) fn reclaim(&self) {
        let work = self
            .work
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        drop(work);
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
