// src/exec/worker.rs

//! The loop every pool thread runs.

use std::sync::Arc;

use crossbeam::channel::{Receiver, Sender};
use tracing::{debug, error, info_span, trace};

use crate::engine::topology::Topology;
use crate::types::TaskState;

/// A ready task: which topology, which node.
pub(crate) struct Job {
    pub(crate) topology: Arc<Topology>,
    pub(crate) node: usize,
}

/// Messages on the shared ready-queue.
pub(crate) enum Message {
    Run(Job),
    Shutdown,
}

pub(crate) struct Worker {
    id: usize,
    rx: Receiver<Message>,
    tx: Sender<Message>,
}

impl Worker {
    pub(crate) fn new(id: usize, rx: Receiver<Message>, tx: Sender<Message>) -> Self {
        Self { id, rx, tx }
    }

    /// Block on the ready-queue until a `Shutdown` message arrives.
    pub(crate) fn run(self) {
        let span = info_span!("worker", worker = self.id);
        let _enter = span.enter();
        debug!("worker started");

        while let Ok(message) = self.rx.recv() {
            match message {
                Message::Run(job) => self.execute(job),
                Message::Shutdown => break,
            }
        }

        debug!("worker stopped");
    }

    /// Run one task, release its successors, then count it as done.
    fn execute(&self, job: Job) {
        let Job { topology, node: index } = job;
        let node = topology.node(index);

        node.set_state(TaskState::Running);
        trace!(topology = topology.id(), task = index, name = node.name().unwrap_or(""), "running task");

        if let Err(cause) = node.invoke() {
            topology.record_failure(index, cause);
        }
        node.set_state(TaskState::Done);

        for &succ in node.successors() {
            let successor = topology.node(succ);
            if successor.release_one() {
                successor.set_state(TaskState::Ready);
                self.submit(Job {
                    topology: Arc::clone(&topology),
                    node: succ,
                });
            }
        }

        topology.finish_task();
    }

    fn submit(&self, job: Job) {
        if self.tx.send(Message::Run(job)).is_err() {
            error!(worker = self.id, "ready-queue closed; dropping task");
        }
    }
}
