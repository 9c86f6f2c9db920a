//! Unified error types for all layers of the application.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for the Courier crates.
///
/// Covers the domain, connectivity, and infrastructure failures the
/// submission pipeline can produce, with HTTP status mapping for the
/// server layer.
#[derive(Error, Debug)]
pub enum CourierError {
    /// Resource not found
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Conflict error (e.g., duplicate submission)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Network unreachable or upstream refused the request
    #[error("Connectivity error: {0}")]
    Connectivity(String),

    /// Client-side store read/write failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Timeout error
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CourierError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Validation(_) => 400,
            Self::Conflict(_) => 409,
            Self::Connectivity(_) | Self::Timeout(_) => 503,
            Self::Configuration(_) | Self::Storage(_) | Self::Internal(_) | Self::Other(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Connectivity(_) => "CONNECTIVITY_ERROR",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a connectivity error.
    #[must_use]
    pub fn connectivity<T: Into<String>>(message: T) -> Self {
        Self::Connectivity(message.into())
    }

    /// Creates a storage error.
    #[must_use]
    pub fn storage<T: Into<String>>(message: T) -> Self {
        Self::Storage(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Checks if this error is retriable.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(
            self,
            Self::Connectivity(_) | Self::Timeout(_) | Self::Storage(_)
        )
    }
}

impl From<serde_json::Error> for CourierError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {}", err))
    }
}

/// Serializable error response for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ErrorResponse {
    /// Creates a new error response from a `CourierError`.
    #[must_use]
    pub fn from_error(error: &CourierError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
        }
    }
}

impl From<&CourierError> for ErrorResponse {
    fn from(error: &CourierError) -> Self {
        Self::from_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(CourierError::not_found("Job", 1).status_code(), 404);
        assert_eq!(CourierError::validation("missing field").status_code(), 400);
        assert_eq!(CourierError::Conflict("duplicate".into()).status_code(), 409);
        assert_eq!(CourierError::connectivity("unreachable").status_code(), 503);
        assert_eq!(CourierError::Timeout("probe".into()).status_code(), 503);
        assert_eq!(CourierError::storage("corrupt").status_code(), 500);
        assert_eq!(CourierError::internal("oops").status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CourierError::not_found("Job", 1).error_code(), "NOT_FOUND");
        assert_eq!(
            CourierError::validation("bad input").error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(
            CourierError::connectivity("down").error_code(),
            "CONNECTIVITY_ERROR"
        );
        assert_eq!(CourierError::storage("bad").error_code(), "STORAGE_ERROR");
        assert_eq!(CourierError::internal("err").error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_retriable_errors() {
        assert!(CourierError::connectivity("unreachable").is_retriable());
        assert!(CourierError::Timeout("probe timed out".into()).is_retriable());
        assert!(CourierError::storage("read failed").is_retriable());
        assert!(!CourierError::validation("bad input").is_retriable());
        assert!(!CourierError::not_found("Job", 1).is_retriable());
    }

    #[test]
    fn test_error_constructors() {
        let not_found = CourierError::not_found("Job", "abc");
        assert!(not_found.to_string().contains("Job"));

        let validation = CourierError::validation("email is required");
        assert!(validation.to_string().contains("email is required"));

        let connectivity = CourierError::connectivity("connection refused");
        assert!(connectivity.to_string().contains("connection refused"));
    }

    #[test]
    fn test_error_response_from_error() {
        let err = CourierError::not_found("Job", 1);
        let response = ErrorResponse::from_error(&err);
        assert_eq!(response.code, "NOT_FOUND");
        assert!(!response.message.is_empty());
    }

    #[test]
    fn test_error_response_from_ref() {
        let err = CourierError::validation("bad payload");
        let response: ErrorResponse = ErrorResponse::from(&err);
        assert_eq!(response.code, "VALIDATION_ERROR");
    }
}
