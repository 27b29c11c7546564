// tests/observer_async.rs

mod common;
use crate::common::{counting_task, init_tracing, with_timeout, TestResult};

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use flowdag::{Flow, FlowdagError, TopologyStatus};

#[tokio::test]
async fn completed_resolves_and_can_be_awaited_again() -> TestResult {
    init_tracing();

    let counter = Arc::new(AtomicUsize::new(0));
    let mut flow = Flow::new(2)?;
    let a = flow.add_task(counting_task(&counter));
    let b = flow.add_task(counting_task(&counter));
    flow.precede(a, b)?;

    let observer = flow.dispatch()?;
    with_timeout(observer.completed()).await?;
    with_timeout(observer.completed()).await?;

    assert_eq!(counter.load(Ordering::SeqCst), 2);
    assert_eq!(observer.status(), TopologyStatus::Completed);
    flow.wait_for_topologies()?;
    Ok(())
}

#[tokio::test]
async fn cloned_observers_wake_from_spawned_tasks() -> TestResult {
    init_tracing();

    let mut flow = Flow::new(2)?;
    flow.add_task(|| std::thread::sleep(Duration::from_millis(30)));
    let observer = flow.dispatch()?;

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let observer = observer.clone();
            tokio::spawn(async move { observer.completed().await.is_ok() })
        })
        .collect();

    for handle in handles {
        assert!(with_timeout(handle).await?);
    }
    flow.wait_for_topologies()?;
    Ok(())
}

#[tokio::test]
async fn completed_reports_task_failure() -> TestResult {
    init_tracing();

    let mut flow = Flow::new(1)?;
    flow.add_named_task("explode", || panic!("kaboom"));
    let observer = flow.dispatch()?;

    let err = with_timeout(observer.completed())
        .await
        .expect_err("panicking task must fail the topology");
    assert!(matches!(err, FlowdagError::TaskFailed { .. }));
    assert!(err.to_string().contains("kaboom"), "{err}");

    assert!(flow.wait_for_topologies().is_err());
    Ok(())
}
