// src/engine/observer.rs

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::dag::TaskId;
use crate::engine::outcome::TopologyOutcome;
use crate::engine::topology::Topology;
use crate::errors::Result;
use crate::types::{TaskState, TopologyStatus};

/// Handle to a dispatched topology's completion signal.
///
/// Cheap to clone. Waiting never consumes the handle, so the same outcome can
/// be read any number of times, from any number of threads.
///
/// Holding an observer does not keep task payloads alive: they are dropped
/// when the owning [`Flow`](crate::Flow) reclaims the topology.
#[derive(Clone)]
pub struct Observer {
    topology: Arc<Topology>,
}

impl Observer {
    pub(crate) fn new(topology: Arc<Topology>) -> Self {
        Self { topology }
    }

    /// Numeric id of the observed topology.
    pub fn id(&self) -> u64 {
        self.topology.id()
    }

    pub fn status(&self) -> TopologyStatus {
        self.topology.status()
    }

    pub fn is_completed(&self) -> bool {
        self.topology.signal().is_set()
    }

    pub fn num_tasks(&self) -> usize {
        self.topology.num_tasks()
    }

    pub fn num_done(&self) -> usize {
        self.topology.num_done()
    }

    /// State of one task of the dispatched graph, or `None` if `task` was
    /// issued by a different graph.
    pub fn task_state(&self, task: TaskId) -> Option<TaskState> {
        if task.graph_id() != self.topology.graph_id() {
            return None;
        }
        self.topology.task_state(task.index())
    }

    /// Block until the topology completes and return the first failure, if any.
    pub fn wait(&self) -> Result<()> {
        self.outcome().into_result()
    }

    /// Like [`wait`](Self::wait), giving up after `timeout`. `None` means the
    /// topology was still active; the work itself is not affected.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<Result<()>> {
        self.topology
            .signal()
            .wait_timeout(timeout)
            .map(TopologyOutcome::into_result)
    }

    /// Block until completion and return the full outcome, every failure included.
    pub fn outcome(&self) -> TopologyOutcome {
        self.topology.signal().wait()
    }

    /// Non-blocking poll.
    pub fn try_outcome(&self) -> Option<TopologyOutcome> {
        self.topology.signal().get()
    }

    /// Async variant of [`wait`](Self::wait); does not block the executor thread.
    pub async fn completed(&self) -> Result<()> {
        self.topology.signal().wait_async().await.into_result()
    }
}

impl fmt::Debug for Observer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observer")
            .field("topology", &self.topology)
            .finish()
    }
}
