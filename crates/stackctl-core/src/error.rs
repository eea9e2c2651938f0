//! Unified error handling for stackctl-core
//!
//! Every failure a workflow can hit (reading the template, a service call,
//! the wait loop) ends up as a [`CoreError`]. Callers get one value to report
//! and a few helpers to classify it.
//!
//! # Example
//!
//! ```rust
//! use stackctl_core::{CoreError, Result};
//! use std::time::Duration;
//!
//! fn handle_error(err: CoreError) {
//!     if err.is_not_found() {
//!         println!("Stack not found");
//!     } else if err.is_retryable() {
//!         println!("Temporary error, can retry");
//!     }
//! }
//!
//! let err = CoreError::WaitTimeout(Duration::from_secs(60));
//! assert!(err.is_timeout());
//! ```

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Core error type for stack and model operations
#[derive(Error, Debug)]
pub enum CoreError {
    /// Template file could not be read
    #[error("Failed to read template {}: {source}", .path.display())]
    Template {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error returned by the remote service or the SDK transport
    #[error("{operation} failed: {message}")]
    Service {
        operation: String,
        code: Option<String>,
        message: String,
    },

    /// Stack reached a terminal status other than the one being waited for
    #[error("Stack '{stack}' reached {status} while waiting for {expected}")]
    StackFailed {
        stack: String,
        status: String,
        expected: String,
    },

    /// Stack disappeared while waiting for it to be created
    #[error("Stack '{stack}' does not exist")]
    StackNotFound { stack: String },

    /// Wait loop gave up before a terminal status was seen
    #[error("Timed out after {0:?} waiting for a terminal stack status")]
    WaitTimeout(Duration),

    /// Validation error (e.g., blank stack name)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Model payload could not be encoded or decoded
    #[error("Invalid model payload: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Build a service error without an error code
    pub fn service(operation: impl Into<String>, message: impl Into<String>) -> Self {
        CoreError::Service {
            operation: operation.into(),
            code: None,
            message: message.into(),
        }
    }

    /// Returns the service error code, if any
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            CoreError::Service { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Returns true if the stack does not exist
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            CoreError::StackNotFound { .. } => true,
            CoreError::Service { code, message, .. } => {
                code.as_deref() == Some("ValidationError") && message.contains("does not exist")
            }
            _ => false,
        }
    }

    /// Returns true if this is a timeout error
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            CoreError::WaitTimeout(_) => true,
            CoreError::Service { code, .. } => code.as_deref() == Some("RequestTimeout"),
            _ => false,
        }
    }

    /// Returns true if the service throttled the request
    #[must_use]
    pub fn is_throttled(&self) -> bool {
        matches!(
            self.code(),
            Some("Throttling" | "ThrottlingException" | "TooManyRequestsException")
        )
    }

    /// Returns true if this is a bad request error
    #[must_use]
    pub fn is_bad_request(&self) -> bool {
        match self {
            CoreError::Validation(_) => true,
            CoreError::Service { code, .. } => {
                matches!(code.as_deref(), Some("ValidationError" | "ValidationException"))
            }
            _ => false,
        }
    }

    /// Returns true if this error is potentially retryable
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.is_throttled() || self.is_timeout()
    }
}
