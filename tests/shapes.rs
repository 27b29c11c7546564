// tests/shapes.rs

mod common;
use crate::common::{init_tracing, Recorder, TestResult};

use flowdag::dag::shapes::populate;
use flowdag::types::GraphShape;
use flowdag::{Flow, Graph};

#[test]
fn chain_links_every_task_to_the_next() -> TestResult {
    let mut graph = Graph::new();
    let tasks = populate(&mut graph, GraphShape::Chain, 5, |_| || {})?;

    assert_eq!(tasks.len(), 5);
    assert_eq!(graph.len(), 5);
    assert_eq!(graph.num_edges(), 4);
    assert_eq!(graph.name_of(tasks[0]), Some("t0"));
    assert_eq!(graph.dependents_of(tasks[3]), vec![tasks[4]]);
    Ok(())
}

#[test]
fn fan_has_source_and_sink() -> TestResult {
    let mut graph = Graph::new();
    let tasks = populate(&mut graph, GraphShape::Fan, 4, |_| || {})?;

    assert_eq!(graph.len(), 6);
    assert_eq!(graph.num_edges(), 8);
    let source = tasks[0];
    let sink = tasks[tasks.len() - 1];
    assert_eq!(graph.name_of(source), Some("source"));
    assert_eq!(graph.name_of(sink), Some("sink"));
    assert_eq!(graph.dependents_of(source).len(), 4);
    assert_eq!(graph.dependencies_of(sink).len(), 4);
    Ok(())
}

#[test]
fn diamond_connects_consecutive_layers() -> TestResult {
    let mut graph = Graph::new();
    let tasks = populate(&mut graph, GraphShape::Diamond, 3, |_| || {})?;

    assert_eq!(tasks.len(), 9);
    assert_eq!(graph.num_edges(), 2 * 9);
    assert!(graph.dependencies_of(tasks[0]).is_empty());
    assert_eq!(graph.dependencies_of(tasks[8]).len(), 3);
    Ok(())
}

#[test]
fn zero_width_is_treated_as_one() -> TestResult {
    let mut graph = Graph::new();
    populate(&mut graph, GraphShape::Chain, 0, |_| || {})?;
    assert_eq!(graph.len(), 1);
    Ok(())
}

#[test]
fn fan_runs_source_first_and_sink_last() -> TestResult {
    init_tracing();

    let recorder = Recorder::new();
    let mut flow = Flow::new(4)?;
    populate(flow.graph_mut(), GraphShape::Fan, 6, |name| recorder.noop(name))?;
    flow.wait_for_all()?;

    for i in 0..6 {
        let middle = format!("t{i}");
        recorder.assert_precedes("source", &middle);
        recorder.assert_precedes(&middle, "sink");
    }
    Ok(())
}
