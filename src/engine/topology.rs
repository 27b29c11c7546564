// src/engine/topology.rs

//! A dispatched graph plus its runtime completion metadata.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use tracing::{debug, error, info, warn};

use crate::dag::{Graph, TaskId};
use crate::dag::node::{InvokeError, Node, panic_message};
use crate::engine::outcome::{TaskFailure, TopologyOutcome};
use crate::engine::signal::Signal;
use crate::types::{TaskState, TopologyStatus};

/// Callback run once when a topology completes.
pub type CompletionAction = Box<dyn FnOnce(&TopologyOutcome) + Send + 'static>;

/// Immutable snapshot of a dispatched [`Graph`].
///
/// Completion happens exactly once, on whichever thread performs the final
/// `finish_task` increment. The order on that thread is: status, signal,
/// completion action, then `retired`. Controller waits block on `retired`,
/// observers on the signal.
pub(crate) struct Topology {
    id: u64,
    graph_id: u64,
    nodes: Vec<Node>,
    done: AtomicUsize,
    completed: AtomicBool,
    failures: Mutex<Vec<TaskFailure>>,
    signal: Signal<TopologyOutcome>,
    retired: Signal<()>,
    action: Mutex<Option<CompletionAction>>,
}

impl Topology {
    pub(crate) fn new(id: u64, graph: Graph, action: Option<CompletionAction>) -> Self {
        let graph_id = graph.id();
        let nodes = graph.freeze();
        Self {
            id,
            graph_id,
            nodes,
            done: AtomicUsize::new(0),
            completed: AtomicBool::new(false),
            failures: Mutex::new(Vec::new()),
            signal: Signal::new(),
            retired: Signal::new(),
            action: Mutex::new(action),
        }
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn graph_id(&self) -> u64 {
        self.graph_id
    }

    pub(crate) fn num_tasks(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn num_done(&self) -> usize {
        self.done.load(Ordering::Acquire)
    }

    pub(crate) fn node(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    pub(crate) fn task_state(&self, index: usize) -> Option<TaskState> {
        self.nodes.get(index).map(Node::state)
    }

    /// Indices of tasks with no predecessors.
    pub(crate) fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.is_root())
            .map(|(index, _)| index)
    }

    pub(crate) fn status(&self) -> TopologyStatus {
        if self.completed.load(Ordering::Acquire) {
            TopologyStatus::Completed
        } else {
            TopologyStatus::Active
        }
    }

    pub(crate) fn signal(&self) -> &Signal<TopologyOutcome> {
        &self.signal
    }

    pub(crate) fn record_failure(&self, index: usize, cause: InvokeError) {
        let node = self.node(index);
        let task = TaskId::from_parts(self.graph_id, index);
        let (message, panicked) = match cause {
            InvokeError::Failed(err) => (format!("{err:#}"), false),
            InvokeError::Panicked(msg) => (msg, true),
        };

        warn!(
            topology = self.id,
            %task,
            name = node.name().unwrap_or(""),
            panicked,
            error = %message,
            "task failed; dependents still run"
        );

        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(TaskFailure {
                task,
                name: node.name().map(str::to_string),
                message,
                panicked,
            });
    }

    /// Count one more task as done; the caller that brings the count to the
    /// total completes the topology.
    pub(crate) fn finish_task(&self) {
        let done = self.done.fetch_add(1, Ordering::AcqRel) + 1;
        if done == self.nodes.len() {
            self.complete();
        }
    }

    /// Transition `Active -> Completed`. Later calls are no-ops.
    pub(crate) fn complete(&self) {
        if self.completed.swap(true, Ordering::AcqRel) {
            return;
        }

        let outcome = TopologyOutcome {
            topology: self.id,
            failures: self
                .failures
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
        };

        if outcome.is_success() {
            info!(topology = self.id, tasks = self.nodes.len(), "topology completed");
        } else {
            warn!(
                topology = self.id,
                tasks = self.nodes.len(),
                failed = outcome.failures.len(),
                "topology completed with failures"
            );
        }

        self.signal.fulfill(outcome.clone());

        let action = self
            .action
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(action) = action {
            debug!(topology = self.id, "running completion action");
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| action(&outcome))) {
                error!(
                    topology = self.id,
                    error = %panic_message(payload.as_ref()),
                    "completion action panicked"
                );
            }
        }

        self.retired.fulfill(());
    }

    /// Block until completion, including the completion action.
    pub(crate) fn wait_retired(&self) {
        self.retired.wait();
    }

    /// Drop every payload. Only called once the topology has retired.
    pub(crate) fn reclaim(&self) {
        debug_assert!(self.retired.is_set(), "reclaiming an unfinished topology");
        for node in &self.nodes {
            node.reclaim();
        }
        debug!(topology = self.id, "reclaimed task payloads");
    }
}

impl fmt::Debug for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Topology")
            .field("id", &self.id)
            .field("graph", &self.graph_id)
            .field("tasks", &self.nodes.len())
            .field("done", &self.num_done())
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}
