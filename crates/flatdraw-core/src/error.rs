//! Error handling for FlatDraw
//!
//! Two failure families reach callers:
//! - Usage errors (an operation invoked in the wrong session state)
//! - Sink errors (a motion batch failed at the robot boundary)
//!
//! Samples outside the workspace or too close to the previous point are
//! never errors; they are absorbed by the capture layer.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Usage error type
///
/// Raised when an operation is invoked in a session state that does not
/// permit it. Fatal to the operation, never to the process: the session can
/// always be reset.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    /// Operation requires a different capture state
    #[error("Cannot {operation} while session is {state}")]
    InvalidState {
        /// The operation that was attempted.
        operation: String,
        /// The capture state at the time of the attempt.
        state: String,
    },

    /// Synthesis was requested for a path with no points
    #[error("Path is empty")]
    EmptyPath,
}

impl UsageError {
    /// Build an `InvalidState` error from displayable parts
    pub fn invalid_state(operation: impl Into<String>, state: impl ToString) -> Self {
        UsageError::InvalidState {
            operation: operation.into(),
            state: state.to_string(),
        }
    }
}

/// Motion sink error type
///
/// Represents a failed batch at the external motion boundary. Detail is
/// opaque to the core; adapters fill in what they know.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    /// Sink has no live link to the robot
    #[error("Robot not connected")]
    NotConnected,

    /// Link could not be established
    #[error("Failed to connect to {address}: {reason}")]
    ConnectionFailed {
        /// The robot address.
        address: String,
        /// The reason the connection failed.
        reason: String,
    },

    /// Robot or controller refused the batch
    #[error("Batch rejected: {reason}")]
    Rejected {
        /// The reason the batch was rejected.
        reason: String,
    },

    /// Batch did not finish within the host's deadline
    #[error("Execution timed out after {timeout_ms}ms")]
    Timeout {
        /// The timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// Execution was cancelled by the host
    #[error("Execution cancelled")]
    Cancelled,

    /// Generic sink error
    #[error("Sink error: {message}")]
    Other {
        /// The error message.
        message: String,
    },
}

impl SinkError {
    /// Whether a retrying adapter should attempt the batch again
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SinkError::NotConnected | SinkError::ConnectionFailed { .. } | SinkError::Other { .. }
        )
    }
}

/// Main error type for FlatDraw
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Usage error
    #[error(transparent)]
    Usage(#[from] UsageError),

    /// Sink error
    #[error(transparent)]
    Sink(#[from] SinkError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Sink(SinkError::Timeout { .. }))
    }

    /// Check if this is a usage error
    pub fn is_usage_error(&self) -> bool {
        matches!(self, Error::Usage(_))
    }

    /// Check if this is a sink error
    pub fn is_sink_error(&self) -> bool {
        matches!(self, Error::Sink(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_error_display() {
        let err = UsageError::invalid_state("synthesize", "Capturing");
        assert_eq!(err.to_string(), "Cannot synthesize while session is Capturing");
        assert_eq!(UsageError::EmptyPath.to_string(), "Path is empty");
    }

    #[test]
    fn test_sink_error_display() {
        let err = SinkError::ConnectionFailed {
            address: "192.168.99.228".to_string(),
            reason: "refused".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to connect to 192.168.99.228: refused");

        let err = SinkError::Timeout { timeout_ms: 1500 };
        assert_eq!(err.to_string(), "Execution timed out after 1500ms");
    }

    #[test]
    fn test_retryable() {
        assert!(SinkError::NotConnected.is_retryable());
        assert!(!SinkError::Cancelled.is_retryable());
        assert!(!SinkError::Rejected {
            reason: "protective stop".to_string()
        }
        .is_retryable());
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = UsageError::EmptyPath.into();
        assert!(err.is_usage_error());
        assert!(!err.is_sink_error());

        let err: Error = SinkError::Timeout { timeout_ms: 10 }.into();
        assert!(err.is_sink_error());
        assert!(err.is_timeout());

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
