use std::time::Duration;
use thiserror::Error;

/// Malformed instance. Detected before any search starts.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum InstanceError {
    #[error("task {task} depends on task {dependency}, but there are only {tasks} tasks")]
    DependencyOutOfRange {
        task: usize,
        dependency: usize,
        tasks: usize,
    },
    #[error("task {task} depends on itself")]
    SelfDependency { task: usize },
}

/// Reason a search did not produce an order.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum SearchError {
    #[error("invalid instance: {0}")]
    InvalidInstance(#[from] InstanceError),
    #[error("no valid ordering exists")]
    NoSolution,
    #[error("search timed out after {elapsed:?}")]
    TimedOut { elapsed: Duration },
}
