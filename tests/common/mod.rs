#![allow(dead_code)]

pub use flowdag_test_utils::builders::{counting_task, GraphBuilder};
pub use flowdag_test_utils::recorder::{Event, Recorder};
pub use flowdag_test_utils::{init_tracing, with_timeout};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;
