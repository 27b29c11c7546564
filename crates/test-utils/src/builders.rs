#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use flowdag::{Graph, TaskId};

use crate::recorder::Recorder;

/// Builder for small hand-written graphs whose tasks log into a [`Recorder`].
///
/// ```ignore
/// let ids = GraphBuilder::new(&recorder)
///     .task("A")
///     .task("B")
///     .edge("A", "B")
///     .build_into(&mut graph);
/// ```
pub struct GraphBuilder {
    recorder: Recorder,
    names: Vec<String>,
    edges: Vec<(String, String)>,
}

impl GraphBuilder {
    pub fn new(recorder: &Recorder) -> Self {
        Self {
            recorder: recorder.clone(),
            names: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn task(mut self, name: &str) -> Self {
        self.names.push(name.to_string());
        self
    }

    pub fn edge(mut self, from: &str, to: &str) -> Self {
        self.edges.push((from.to_string(), to.to_string()));
        self
    }

    /// Add the tasks and edges to `graph`; returns handles in declaration order.
    pub fn build_into(self, graph: &mut Graph) -> Vec<(String, TaskId)> {
        let ids: Vec<(String, TaskId)> = self
            .names
            .iter()
            .map(|n| (n.clone(), graph.add_named_task(n.clone(), self.recorder.noop(n))))
            .collect();

        let lookup = |name: &str| {
            ids.iter()
                .find(|(n, _)| n == name)
                .map(|(_, id)| *id)
                .unwrap_or_else(|| panic!("unknown task {name} in edge"))
        };

        for (from, to) in &self.edges {
            graph
                .precede(lookup(from), lookup(to))
                .expect("builder edges must form a DAG");
        }

        ids
    }
}

/// A payload that bumps `counter` once per run.
pub fn counting_task(counter: &Arc<AtomicUsize>) -> impl FnMut() + Send + 'static + use<> {
    let counter = Arc::clone(counter);
    move || {
        counter.fetch_add(1, Ordering::SeqCst);
    }
}
