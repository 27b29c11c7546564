// src/engine/flow.rs

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info, warn};

use crate::config::{ExecutorConfig, validate_executor};
use crate::dag::{Graph, TaskId};
use crate::engine::observer::Observer;
use crate::engine::outcome::TopologyOutcome;
use crate::engine::topology::{CompletionAction, Topology};
use crate::errors::Result;
use crate::exec::WorkerPool;

static NEXT_TOPOLOGY_ID: AtomicU64 = AtomicU64::new(1);

/// The user-facing controller.
///
/// A `Flow` owns:
/// - the working [`Graph`] that tasks are added to,
/// - every dispatched topology until it is reclaimed,
/// - the worker pool shared by all topologies.
///
/// Dispatching freezes the working graph and immediately replaces it with an
/// empty one, so the next graph can be built while the previous one runs.
///
/// Task payloads (and whatever they capture) are only dropped when their
/// topology is reclaimed: by [`wait_for_all`](Self::wait_for_all),
/// [`wait_for_topologies`](Self::wait_for_topologies), or teardown.
/// Dropping a `Flow` blocks until every dispatched topology has completed.
#[derive(Debug)]
pub struct Flow {
    graph: Graph,
    topologies: Vec<Arc<Topology>>,
    pool: WorkerPool,
}

impl Flow {
    /// Create a flow with `workers` threads and default settings otherwise.
    pub fn new(workers: usize) -> Result<Self> {
        Self::with_config(ExecutorConfig {
            workers,
            ..ExecutorConfig::default()
        })
    }

    pub fn with_config(config: ExecutorConfig) -> Result<Self> {
        validate_executor(&config)?;
        let pool = WorkerPool::new(&config)?;
        Ok(Self {
            graph: Graph::new(),
            topologies: Vec::new(),
            pool,
        })
    }

    pub fn num_workers(&self) -> usize {
        self.pool.num_workers()
    }

    /// Number of dispatched topologies not yet reclaimed (active or not).
    pub fn num_topologies(&self) -> usize {
        self.topologies.len()
    }

    /// The working (not yet dispatched) graph.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    pub fn add_task<F>(&mut self, work: F) -> TaskId
    where
        F: FnMut() + Send + 'static,
    {
        self.graph.add_task(work)
    }

    pub fn add_named_task<F>(&mut self, name: impl Into<String>, work: F) -> TaskId
    where
        F: FnMut() + Send + 'static,
    {
        self.graph.add_named_task(name, work)
    }

    pub fn add_fallible_task<F>(&mut self, work: F) -> TaskId
    where
        F: FnMut() -> anyhow::Result<()> + Send + 'static,
    {
        self.graph.add_fallible_task(work)
    }

    pub fn precede(&mut self, from: TaskId, to: TaskId) -> Result<()> {
        self.graph.precede(from, to)
    }

    /// Dispatch the working graph and block until every tracked topology has
    /// completed, then reclaim them all.
    ///
    /// Returns the first recorded task failure among the reclaimed
    /// topologies, in dispatch order.
    pub fn wait_for_all(&mut self) -> Result<()> {
        self.dispatch_inner(None)?;
        self.wait_for_topologies()
    }

    /// Dispatch the working graph without blocking.
    pub fn dispatch(&mut self) -> Result<Observer> {
        self.dispatch_inner(None)
    }

    /// Dispatch, running `action` once on the worker that completes the topology.
    pub fn dispatch_with<F>(&mut self, action: F) -> Result<Observer>
    where
        F: FnOnce(&TopologyOutcome) + Send + 'static,
    {
        self.dispatch_inner(Some(Box::new(action)))
    }

    /// Dispatch without an observer. The topology is still tracked and is
    /// covered by bulk waits and teardown.
    pub fn silent_dispatch(&mut self) -> Result<()> {
        self.dispatch_inner(None).map(drop)
    }

    pub fn silent_dispatch_with<F>(&mut self, action: F) -> Result<()>
    where
        F: FnOnce(&TopologyOutcome) + Send + 'static,
    {
        self.dispatch_inner(Some(Box::new(action))).map(drop)
    }

    /// Block until every tracked topology has completed, then reclaim all of
    /// them. The working graph is left untouched.
    pub fn wait_for_topologies(&mut self) -> Result<()> {
        let topologies = std::mem::take(&mut self.topologies);
        if topologies.is_empty() {
            return Ok(());
        }

        debug!(count = topologies.len(), "waiting for tracked topologies");
        for topology in &topologies {
            topology.wait_retired();
        }

        let mut first_error = None;
        for topology in &topologies {
            topology.reclaim();
            if first_error.is_none() {
                if let Err(err) = topology.signal().wait().into_result() {
                    first_error = Some(err);
                }
            }
        }

        info!(count = topologies.len(), "reclaimed completed topologies");
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Explicit teardown: bulk wait, then stop the worker pool.
    pub fn shutdown(mut self) -> Result<()> {
        let result = self.wait_for_topologies();
        self.pool.shutdown();
        result
    }

    fn dispatch_inner(&mut self, action: Option<CompletionAction>) -> Result<Observer> {
        let graph = std::mem::take(&mut self.graph);
        let id = NEXT_TOPOLOGY_ID.fetch_add(1, Ordering::Relaxed);

        debug!(
            topology = id,
            graph = graph.id(),
            tasks = graph.len(),
            edges = graph.num_edges(),
            "dispatching graph"
        );

        let topology = Arc::new(Topology::new(id, graph, action));
        self.pool.schedule(&topology)?;
        self.topologies.push(Arc::clone(&topology));

        Ok(Observer::new(topology))
    }
}

impl Drop for Flow {
    fn drop(&mut self) {
        if let Err(err) = self.wait_for_topologies() {
            warn!(error = %err, "flow dropped with failed topologies");
        }
        self.pool.shutdown();
    }
}
