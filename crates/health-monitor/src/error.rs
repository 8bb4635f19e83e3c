//! Monitor error type.

use std::time::Duration;

use health_records::RecordError;
use thiserror::Error;

/// Errors surfaced by background monitor tasks.
#[derive(Error, Debug)]
pub enum MonitorError {
    /// Import or export failed.
    #[error(transparent)]
    Record(#[from] RecordError),

    /// The background task panicked or was aborted.
    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// The caller stopped waiting for the task.
    #[error("background task did not finish within {0:?}")]
    Timeout(Duration),
}

/// Result type for monitor operations.
pub type MonitorResult<T> = Result<T, MonitorError>;
