// tests/error_handling.rs

mod common;
use crate::common::{init_tracing, TestResult};

use std::fs;

use flowdag::config::{load_and_validate, load_from_path, ConfigFile};
use flowdag::{Flow, FlowdagError, Graph};
use tempfile::tempdir;

#[test]
fn cycle_is_rejected_and_graph_unchanged() -> TestResult {
    init_tracing();

    let mut graph = Graph::new();
    let a = graph.add_task(|| {});
    let b = graph.add_task(|| {});
    let c = graph.add_task(|| {});
    graph.precede(a, b)?;
    graph.precede(b, c)?;

    let err = graph.precede(c, a).expect_err("c -> a closes a cycle");
    match err {
        FlowdagError::Cycle { from, to } => {
            assert_eq!(from, c);
            assert_eq!(to, a);
        }
        other => panic!("expected Cycle, got {other:?}"),
    }
    assert_eq!(graph.num_edges(), 2);
    assert!(graph.dependents_of(c).is_empty());
    Ok(())
}

#[test]
fn self_loop_is_rejected() {
    let mut graph = Graph::new();
    let a = graph.add_task(|| {});
    assert!(matches!(graph.precede(a, a), Err(FlowdagError::SelfLoop(t)) if t == a));
    assert_eq!(graph.num_edges(), 0);
}

#[test]
fn duplicate_edge_is_a_noop() -> TestResult {
    let mut graph = Graph::new();
    let a = graph.add_task(|| {});
    let b = graph.add_task(|| {});
    graph.precede(a, b)?;
    graph.precede(a, b)?;
    graph.succeed(b, a)?;

    assert_eq!(graph.num_edges(), 1);
    assert_eq!(graph.dependencies_of(b), vec![a]);
    Ok(())
}

#[test]
fn handles_from_another_graph_are_rejected() -> TestResult {
    let mut first = Graph::new();
    let mut second = Graph::new();
    let a = first.add_task(|| {});
    let b = second.add_task(|| {});

    assert!(matches!(first.precede(a, b), Err(FlowdagError::ForeignTask(t)) if t == b));
    assert!(matches!(
        first.set_name(b, "x"),
        Err(FlowdagError::ForeignTask(_))
    ));
    assert_eq!(first.name_of(b), None);
    Ok(())
}

#[test]
fn handles_are_stale_after_dispatch() -> TestResult {
    init_tracing();

    let mut flow = Flow::new(1)?;
    let old = flow.add_task(|| {});
    let observer = flow.dispatch()?;

    let new = flow.add_task(|| {});
    assert!(matches!(
        flow.precede(old, new),
        Err(FlowdagError::ForeignTask(_))
    ));
    // The old handle still identifies its task on the dispatched topology.
    observer.wait()?;
    assert!(observer.task_state(old).is_some());
    assert_eq!(observer.task_state(new), None);

    flow.wait_for_all()?;
    Ok(())
}

#[test]
fn zero_workers_is_a_config_error() {
    assert!(matches!(Flow::new(0), Err(FlowdagError::ConfigError(_))));
}

#[test]
fn valid_config_file_loads() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("Flowdag.toml");
    fs::write(
        &path,
        r#"
[executor]
workers = 3
thread_name = "cfg-worker"
"#,
    )?;

    let raw = load_from_path(&path)?;
    let cfg = ConfigFile::try_from(raw)?;
    assert_eq!(cfg.executor.workers, 3);
    assert_eq!(cfg.executor.thread_name, "cfg-worker");

    let flow = Flow::with_config(cfg.executor)?;
    assert_eq!(flow.num_workers(), 3);
    Ok(())
}

#[test]
fn empty_config_file_uses_defaults() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("Flowdag.toml");
    fs::write(&path, "")?;

    let raw = load_from_path(&path)?;
    assert!(raw.executor.workers >= 1);
    assert_eq!(raw.executor.thread_name, "flowdag-worker");
    Ok(())
}

#[test]
fn zero_workers_in_file_fails_validation() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("Flowdag.toml");
    fs::write(&path, "[executor]\nworkers = 0\n")?;

    let raw = load_from_path(&path)?;
    assert!(matches!(
        ConfigFile::try_from(raw),
        Err(FlowdagError::ConfigError(_))
    ));
    Ok(())
}

#[test]
fn blank_thread_name_fails_validation() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("Flowdag.toml");
    fs::write(&path, "[executor]\nthread_name = \"  \"\n")?;

    let raw = load_from_path(&path)?;
    assert!(matches!(
        ConfigFile::try_from(raw),
        Err(FlowdagError::ConfigError(_))
    ));
    Ok(())
}

#[test]
fn malformed_toml_is_reported() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("Flowdag.toml");
    fs::write(&path, "[executor\nworkers = ")?;

    assert!(matches!(
        load_from_path(&path),
        Err(FlowdagError::TomlError(_))
    ));
    Ok(())
}

#[test]
fn missing_config_file_is_an_io_error() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("does-not-exist.toml");

    assert!(matches!(
        load_and_validate(&path),
        Err(FlowdagError::IoError(_))
    ));
    Ok(())
}
