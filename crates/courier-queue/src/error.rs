//! Queue error types.

use thiserror::Error;

/// Result type for queue operations.
pub type QueueResult<T> = Result<T, QueueError>;

/// Queue-related errors.
#[derive(Debug, Error)]
pub enum QueueError {
    /// Submission rejected at intake.
    #[error("Invalid submission: {0}")]
    Validation(String),

    /// Job execution failed.
    #[error("Job execution failed: {0}")]
    ExecutionFailed(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Job not found.
    #[error("Job not found: {0}")]
    NotFound(String),

    /// Worker error (handler panicked or the loop was misused).
    #[error("Worker error: {0}")]
    Worker(String),

    /// Engine is not running.
    #[error("Engine is stopped")]
    Stopped,

    /// Max attempts exhausted.
    #[error("Max attempts exceeded for job {job_id}: {attempts} attempts")]
    MaxAttemptsExceeded { job_id: String, attempts: u32 },

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl QueueError {
    /// Returns true if a failed attempt with this error may be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            QueueError::ExecutionFailed(_) | QueueError::Worker(_)
        )
    }
}

impl From<QueueError> for courier_core::CourierError {
    fn from(err: QueueError) -> Self {
        match err {
            QueueError::Validation(msg) => courier_core::CourierError::Validation(msg),
            QueueError::NotFound(id) => courier_core::CourierError::not_found("Job", id),
            other => courier_core::CourierError::Internal(other.to_string()),
        }
    }
}
