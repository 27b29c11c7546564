use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};

/// One observation made from inside a task payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Start(String),
    End(String),
}

/// Shared, append-only log of task starts and ends.
///
/// Clone it into payloads; every clone writes to the same log.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<(Event, ThreadId)>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self, label: &str) {
        self.push(Event::Start(label.to_string()));
    }

    pub fn end(&self, label: &str) {
        self.push(Event::End(label.to_string()));
    }

    /// A payload that records its start and end around `body`.
    pub fn task<F>(&self, label: &str, mut body: F) -> impl FnMut() + Send + 'static + use<F>
    where
        F: FnMut() + Send + 'static,
    {
        let recorder = self.clone();
        let label = label.to_string();
        move || {
            recorder.start(&label);
            body();
            recorder.end(&label);
        }
    }

    /// A payload that only records start and end.
    pub fn noop(&self, label: &str) -> impl FnMut() + Send + 'static + use<> {
        self.task(label, || {})
    }

    pub fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(e, _)| e.clone())
            .collect()
    }

    /// Position of the first `event` in the log.
    pub fn position(&self, event: &Event) -> Option<usize> {
        self.events().iter().position(|e| e == event)
    }

    /// Number of times `label` started.
    pub fn starts(&self, label: &str) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, Event::Start(l) if l == label))
            .count()
    }

    /// Thread each label started on.
    pub fn threads(&self) -> HashMap<String, ThreadId> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|(e, t)| match e {
                Event::Start(l) => Some((l.clone(), *t)),
                Event::End(_) => None,
            })
            .collect()
    }

    /// Panics unless `before` ended before `after` started.
    pub fn assert_precedes(&self, before: &str, after: &str) {
        let end = self
            .position(&Event::End(before.to_string()))
            .unwrap_or_else(|| panic!("{before} never finished"));
        let start = self
            .position(&Event::Start(after.to_string()))
            .unwrap_or_else(|| panic!("{after} never started"));
        assert!(
            end < start,
            "{after} started (event {start}) before {before} finished (event {end}): {:?}",
            self.events()
        );
    }

    fn push(&self, event: Event) {
        self.events
            .lock()
            .unwrap()
            .push((event, thread::current().id()));
    }
}
