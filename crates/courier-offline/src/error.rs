//! Offline-path error types.

use thiserror::Error;

/// Result type for offline-path operations.
pub type OfflineResult<T> = Result<T, OfflineError>;

/// Errors from the client-side resilience stack.
#[derive(Debug, Error)]
pub enum OfflineError {
    /// Offline store read/write failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The server refused the submission (non-success response).
    #[error("Intake rejected the submission: {0}")]
    Rejected(String),

    /// Transport-level failure reaching the server.
    #[error("Connectivity error: {0}")]
    Connectivity(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for OfflineError {
    fn from(err: reqwest::Error) -> Self {
        OfflineError::Connectivity(err.to_string())
    }
}

impl From<OfflineError> for courier_core::CourierError {
    fn from(err: OfflineError) -> Self {
        match err {
            OfflineError::Storage(msg) => courier_core::CourierError::Storage(msg),
            OfflineError::Rejected(msg) => courier_core::CourierError::Validation(msg),
            OfflineError::Connectivity(msg) => courier_core::CourierError::Connectivity(msg),
            other => courier_core::CourierError::Internal(other.to_string()),
        }
    }
}
