// src/dag/graph.rs

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use petgraph::Direction;
use petgraph::algo::has_path_connecting;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::trace;

use crate::dag::node::Node;
use crate::errors::{FlowdagError, Result};

/// Boxed payload stored in every task.
pub type Work = Box<dyn FnMut() -> anyhow::Result<()> + Send + 'static>;

static NEXT_GRAPH_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque handle to a task inside one particular [`Graph`].
///
/// Handles remember which graph issued them, so using a handle from a graph
/// that has already been dispatched is reported as an error instead of
/// silently pointing at an unrelated task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId {
    graph: u64,
    index: NodeIndex,
}

impl TaskId {
    /// Position of the task inside its graph (insertion order).
    pub fn index(&self) -> usize {
        self.index.index()
    }

    pub(crate) fn from_parts(graph: u64, index: usize) -> Self {
        Self {
            graph,
            index: NodeIndex::new(index),
        }
    }

    pub(crate) fn graph_id(&self) -> u64 {
        self.graph
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.graph, self.index.index())
    }
}

struct TaskEntry {
    name: Option<String>,
    work: Work,
}

/// A mutable DAG of tasks under construction.
///
/// Edges point from a task to the tasks that must wait for it. Acyclicity is
/// checked at every `precede` call, so a `Graph` is always a valid DAG.
pub struct Graph {
    id: u64,
    inner: DiGraph<TaskEntry, ()>,
}

impl Graph {
    pub fn new() -> Self {
        Self {
            id: NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed),
            inner: DiGraph::new(),
        }
    }

    /// Unique id of this graph; topologies built from it report the same id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Add an infallible task.
    pub fn add_task<F>(&mut self, mut work: F) -> TaskId
    where
        F: FnMut() + Send + 'static,
    {
        self.insert(
            None,
            Box::new(move || {
                work();
                Ok::<(), anyhow::Error>(())
            }),
        )
    }

    /// Add a task whose `Err` marks it (and its topology) as failed.
    pub fn add_fallible_task<F>(&mut self, work: F) -> TaskId
    where
        F: FnMut() -> anyhow::Result<()> + Send + 'static,
    {
        self.insert(None, Box::new(work))
    }

    pub fn add_named_task<F>(&mut self, name: impl Into<String>, mut work: F) -> TaskId
    where
        F: FnMut() + Send + 'static,
    {
        self.insert(
            Some(name.into()),
            Box::new(move || {
                work();
                Ok::<(), anyhow::Error>(())
            }),
        )
    }

    pub fn set_name(&mut self, task: TaskId, name: impl Into<String>) -> Result<()> {
        self.check_owned(task)?;
        if let Some(entry) = self.inner.node_weight_mut(task.index) {
            entry.name = Some(name.into());
        }
        Ok(())
    }

    pub fn name_of(&self, task: TaskId) -> Option<&str> {
        if task.graph != self.id {
            return None;
        }
        self.inner.node_weight(task.index)?.name.as_deref()
    }

    /// `from` must finish before `to` starts.
    ///
    /// Repeating an existing edge is a no-op. An edge that would close a
    /// cycle is rejected and the graph is left unchanged.
    pub fn precede(&mut self, from: TaskId, to: TaskId) -> Result<()> {
        self.check_owned(from)?;
        self.check_owned(to)?;

        if from == to {
            return Err(FlowdagError::SelfLoop(from));
        }
        if self.inner.contains_edge(from.index, to.index) {
            return Ok(());
        }
        if has_path_connecting(&self.inner, to.index, from.index, None) {
            return Err(FlowdagError::Cycle { from, to });
        }

        self.inner.add_edge(from.index, to.index, ());
        trace!(graph = self.id, %from, %to, "added precedence edge");
        Ok(())
    }

    /// Mirror of [`precede`](Self::precede): `to` waits for `from`.
    pub fn succeed(&mut self, to: TaskId, from: TaskId) -> Result<()> {
        self.precede(from, to)
    }

    pub fn len(&self) -> usize {
        self.inner.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.node_count() == 0
    }

    pub fn num_edges(&self) -> usize {
        self.inner.edge_count()
    }

    /// All task handles, in insertion order.
    pub fn tasks(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.inner.node_indices().map(|index| TaskId {
            graph: self.id,
            index,
        })
    }

    /// Immediate predecessors of `task`.
    pub fn dependencies_of(&self, task: TaskId) -> Vec<TaskId> {
        self.neighbors(task, Direction::Incoming)
    }

    /// Immediate successors of `task`.
    pub fn dependents_of(&self, task: TaskId) -> Vec<TaskId> {
        self.neighbors(task, Direction::Outgoing)
    }

    /// Consume the graph and lay it out as runtime nodes.
    ///
    /// Node `i` of the result corresponds to `TaskId::index() == i`.
    pub(crate) fn freeze(self) -> Vec<Node> {
        let (nodes, edges) = self.inner.into_nodes_edges();

        let mut successors: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
        let mut predecessors = vec![0usize; nodes.len()];
        for edge in &edges {
            successors[edge.source().index()].push(edge.target().index());
            predecessors[edge.target().index()] += 1;
        }

        nodes
            .into_iter()
            .zip(successors)
            .zip(predecessors)
            .map(|((node, succ), preds)| Node::new(node.weight.name, node.weight.work, succ, preds))
            .collect()
    }

    fn insert(&mut self, name: Option<String>, work: Work) -> TaskId {
        let index = self.inner.add_node(TaskEntry { name, work });
        TaskId {
            graph: self.id,
            index,
        }
    }

    fn check_owned(&self, task: TaskId) -> Result<()> {
        if task.graph != self.id || self.inner.node_weight(task.index).is_none() {
            return Err(FlowdagError::ForeignTask(task));
        }
        Ok(())
    }

    fn neighbors(&self, task: TaskId, dir: Direction) -> Vec<TaskId> {
        if task.graph != self.id {
            return Vec::new();
        }
        let mut out: Vec<TaskId> = self
            .inner
            .neighbors_directed(task.index, dir)
            .map(|index| TaskId {
                graph: self.id,
                index,
            })
            .collect();
        out.sort_by_key(|t| t.index());
        out
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("id", &self.id)
            .field("tasks", &self.inner.node_count())
            .field("edges", &self.inner.edge_count())
            .finish()
    }
}
