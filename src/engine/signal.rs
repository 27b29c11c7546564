// src/engine/signal.rs

//! One-shot, multi-observer signal.
//!
//! Blocking waiters park on a condvar; async waiters use a Tokio `Notify`.
//! Reading the value never consumes it.

use std::pin::pin;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::Notify;

#[derive(Debug)]
pub(crate) struct Signal<T> {
    value: Mutex<Option<T>>,
    cond: Condvar,
    notify: Notify,
}

impl<T: Clone> Signal<T> {
    pub(crate) fn new() -> Self {
        Self {
            value: Mutex::new(None),
            cond: Condvar::new(),
            notify: Notify::new(),
        }
    }

    /// Store `value` and wake every waiter.
    ///
    /// Only the first call has any effect; it returns `true`.
    pub(crate) fn fulfill(&self, value: T) -> bool {
        {
            let mut slot = self.lock();
            if slot.is_some() {
                return false;
            }
            *slot = Some(value);
        }
        self.cond.notify_all();
        self.notify.notify_waiters();
        true
    }

    pub(crate) fn get(&self) -> Option<T> {
        self.lock().clone()
    }

    pub(crate) fn is_set(&self) -> bool {
        self.lock().is_some()
    }

    pub(crate) fn wait(&self) -> T {
        let mut slot = self.lock();
        loop {
            if let Some(value) = slot.as_ref() {
                return value.clone();
            }
            slot = self.cond.wait(slot).unwrap_or_else(PoisonError::into_inner);
        }
    }

    pub(crate) fn wait_timeout(&self, timeout: Duration) -> Option<T> {
        let (slot, _) = self
            .cond
            .wait_timeout_while(self.lock(), timeout, |v| v.is_none())
            .unwrap_or_else(PoisonError::into_inner);
        slot.clone()
    }

    pub(crate) async fn wait_async(&self) -> T {
        loop {
            let mut notified = pin!(self.notify.notified());
            // Register before checking so a concurrent `fulfill` cannot slip
            // between the check and the await.
            notified.as_mut().enable();
            if let Some(value) = self.get() {
                return value;
            }
            notified.await;
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<T>> {
        self.value.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
