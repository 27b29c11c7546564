// src/exec/pool.rs

//! Fixed-size worker pool sharing one ready-queue.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, Sender};
use tracing::{debug, error, info};

use crate::config::ExecutorConfig;
use crate::engine::topology::Topology;
use crate::errors::{FlowdagError, Result};
use crate::exec::worker::{Job, Message, Worker};
use crate::types::TaskState;

/// Worker threads plus the sending half of their ready-queue.
///
/// Threads are created once and live until [`shutdown`](Self::shutdown) (or
/// drop). Shutdown is cooperative: each worker finishes its current task and
/// exits when it dequeues a `Shutdown` message, so callers must let every
/// topology complete first if queued work is to run.
#[derive(Debug)]
pub struct WorkerPool {
    tx: Sender<Message>,
    handles: Vec<JoinHandle<()>>,
    size: usize,
}

impl WorkerPool {
    pub fn new(config: &ExecutorConfig) -> Result<Self> {
        let size = config.workers.max(1);
        let (tx, rx) = channel::unbounded::<Message>();

        let mut handles = Vec::with_capacity(size);
        for id in 0..size {
            let worker = Worker::new(id, rx.clone(), tx.clone());
            let spawned = thread::Builder::new()
                .name(format!("{}-{}", config.thread_name, id))
                .spawn(move || worker.run());
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(err) => {
                    error!(worker = id, error = %err, "failed to spawn worker thread");
                    let mut partial = Self { tx, handles, size: id };
                    partial.shutdown();
                    return Err(err.into());
                }
            }
        }

        info!(workers = size, "worker pool started");
        Ok(Self { tx, handles, size })
    }

    pub fn num_workers(&self) -> usize {
        self.size
    }

    /// Seed a freshly dispatched topology: every root goes straight onto the
    /// ready-queue. A topology with no tasks completes right here.
    pub(crate) fn schedule(&self, topology: &Arc<Topology>) -> Result<()> {
        if topology.num_tasks() == 0 {
            debug!(topology = topology.id(), "empty topology; completing immediately");
            topology.complete();
            return Ok(());
        }

        let mut roots = 0usize;
        for index in topology.roots() {
            topology.node(index).set_state(TaskState::Ready);
            self.tx
                .send(Message::Run(Job {
                    topology: Arc::clone(topology),
                    node: index,
                }))
                .map_err(|_| FlowdagError::PoolError("ready-queue closed".to_string()))?;
            roots += 1;
        }

        debug!(
            topology = topology.id(),
            tasks = topology.num_tasks(),
            roots,
            "seeded topology roots"
        );
        Ok(())
    }

    /// Stop and join every worker. Idempotent.
    pub fn shutdown(&mut self) {
        if self.handles.is_empty() {
            return;
        }

        for _ in 0..self.handles.len() {
            if self.tx.send(Message::Shutdown).is_err() {
                break;
            }
        }

        for handle in self.handles.drain(..) {
            let name = handle.thread().name().unwrap_or("<unnamed>").to_string();
            if handle.join().is_err() {
                error!(thread = %name, "worker thread panicked");
            }
        }

        info!(workers = self.size, "worker pool stopped");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}
