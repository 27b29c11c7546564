// src/dag/shapes.rs

//! Canned graph shapes, used by the demo binary and by tests.

use crate::dag::{Graph, TaskId};
use crate::errors::Result;
use crate::types::GraphShape;

/// Populate `graph` with `shape`, creating each task's payload via
/// `make_work(name)`.
///
/// Returns the created handles in insertion order. Task names are `t0`,
/// `t1`, ... except for the `Fan` shape, whose ends are `source` and `sink`.
pub fn populate<F, W>(
    graph: &mut Graph,
    shape: GraphShape,
    width: usize,
    mut make_work: F,
) -> Result<Vec<TaskId>>
where
    F: FnMut(&str) -> W,
    W: FnMut() + Send + 'static,
{
    let width = width.max(1);
    let mut add = |graph: &mut Graph, name: String| {
        let work = make_work(&name);
        graph.add_named_task(name, work)
    };

    let mut tasks = Vec::new();

    match shape {
        GraphShape::Chain => {
            for i in 0..width {
                let task = add(graph, format!("t{i}"));
                if let Some(&prev) = tasks.last() {
                    graph.precede(prev, task)?;
                }
                tasks.push(task);
            }
        }
        GraphShape::Fan => {
            let source = add(graph, "source".to_string());
            tasks.push(source);
            let middle: Vec<TaskId> = (0..width)
                .map(|i| add(graph, format!("t{i}")))
                .collect();
            let sink = add(graph, "sink".to_string());
            for &task in &middle {
                graph.precede(source, task)?;
                graph.precede(task, sink)?;
            }
            tasks.extend(middle);
            tasks.push(sink);
        }
        GraphShape::Diamond => {
            let mut previous: Vec<TaskId> = Vec::new();
            for layer in 0..width {
                let current: Vec<TaskId> = (0..width)
                    .map(|i| add(graph, format!("t{}", layer * width + i)))
                    .collect();
                for &from in &previous {
                    for &to in &current {
                        graph.precede(from, to)?;
                    }
                }
                tasks.extend(current.iter().copied());
                previous = current;
            }
        }
    }

    Ok(tasks)
}
