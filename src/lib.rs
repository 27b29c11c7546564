// src/lib.rs

//! flowdag: run DAGs of tasks on a fixed pool of worker threads.
//!
//! Build a graph on a [`Flow`], then either block on it
//! ([`Flow::wait_for_all`]) or dispatch it and keep going
//! ([`Flow::dispatch`], [`Flow::silent_dispatch`]). Every dispatch freezes
//! the working graph into its own topology, so several graphs can run on the
//! shared pool at once.
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! # fn main() -> flowdag::Result<()> {
//! let counter = Arc::new(AtomicUsize::new(0));
//! let mut flow = flowdag::Flow::new(4)?;
//!
//! let c = Arc::clone(&counter);
//! let a = flow.add_task(move || { c.fetch_add(1, Ordering::SeqCst); });
//! let c = Arc::clone(&counter);
//! let b = flow.add_task(move || { c.fetch_add(1, Ordering::SeqCst); });
//! flow.precede(a, b)?;
//!
//! flow.wait_for_all()?;
//! assert_eq!(counter.load(Ordering::SeqCst), 2);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod types;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use tracing::{debug, info};

pub use crate::config::ExecutorConfig;
pub use crate::dag::{Graph, TaskId};
pub use crate::engine::{Flow, Observer, TaskFailure, TopologyOutcome};
pub use crate::errors::{FlowdagError, Result};
pub use crate::types::{TaskState, TopologyStatus};

use crate::cli::CliArgs;
use crate::config::{default_config_path, load_and_validate};
use crate::dag::shapes;

/// High-level entry point used by `main.rs`.
///
/// Builds one graph per round, dispatches them all asynchronously, then
/// awaits every observer.
pub async fn run(args: CliArgs) -> anyhow::Result<()> {
    let mut executor = match &args.config {
        Some(path) => load_and_validate(path)?.executor,
        None => {
            let default_path = default_config_path();
            if default_path.is_file() {
                debug!(path = %default_path.display(), "using config from working directory");
                load_and_validate(&default_path)?.executor
            } else {
                ExecutorConfig::from_env()?
            }
        }
    };
    if let Some(workers) = args.workers {
        executor.workers = workers;
    }

    if args.dry_run {
        print_dry_run(&args, &executor);
        return Ok(());
    }

    let mut flow = Flow::with_config(executor)?;
    let executed = Arc::new(AtomicUsize::new(0));
    let work = Duration::from_millis(args.work_ms);
    let started = Instant::now();

    let mut observers = Vec::with_capacity(args.rounds);
    for round in 0..args.rounds {
        shapes::populate(flow.graph_mut(), args.shape, args.width, |_name| {
            let executed = Arc::clone(&executed);
            move || {
                if !work.is_zero() {
                    std::thread::sleep(work);
                }
                executed.fetch_add(1, Ordering::Relaxed);
            }
        })?;

        let observer = flow.dispatch_with(move |outcome| {
            debug!(round, topology = outcome.topology, "round finished");
        })?;
        info!(round, topology = observer.id(), tasks = observer.num_tasks(), "dispatched round");
        observers.push(observer);
    }

    for observer in &observers {
        observer.completed().await?;
    }
    flow.wait_for_topologies()?;

    println!(
        "ran {} tasks in {} topologies on {} workers in {:?}",
        executed.load(Ordering::Relaxed),
        observers.len(),
        flow.num_workers(),
        started.elapsed()
    );

    flow.shutdown()?;
    Ok(())
}

fn print_dry_run(args: &CliArgs, executor: &ExecutorConfig) {
    println!("flowdag dry-run");
    println!("  executor.workers = {}", executor.workers);
    println!("  executor.thread_name = {}", executor.thread_name);
    println!("  shape = {:?}, width = {}", args.shape, args.width);
    println!("  rounds = {}, work_ms = {}", args.rounds, args.work_ms);

    debug!("dry-run complete (no execution)");
}
