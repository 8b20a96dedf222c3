//! Error types for the openfiles library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for openfiles operations.
#[derive(Error, Debug)]
pub enum OpenfilesError {
    /// The service could not be reached (DNS, connect, timeout, broken connection).
    #[error("Connection error: {0}")]
    Connection(String),

    /// An operation was attempted after the client was closed.
    #[error("Session is closed")]
    SessionClosed,

    /// The API token was rejected.
    #[error("Authentication failed ({status}): {message}")]
    Auth { status: u16, message: String },

    /// The requested bag does not exist on the service.
    #[error("Not found ({status}): {message}")]
    NotFound { status: u16, message: String },

    /// A success response did not match the expected shape.
    #[error("Unexpected response shape: {0}")]
    Schema(String),

    /// Local or network I/O failed while streaming a transfer.
    #[error("Transfer failed: {0}")]
    Transfer(String),

    /// The download destination is unusable.
    #[error("Invalid destination: {0}")]
    Destination(String),

    /// Any other non-success response from the service.
    #[error("Service error ({status}): {message}")]
    Service { status: u16, message: String },

    /// Invalid client configuration (token, base URL, proxy).
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Invalid argument passed to an operation.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The local upload source does not exist or has the wrong type.
    #[error("Source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// Transfer cancelled by a progress callback.
    #[error("Transfer cancelled")]
    Cancelled,
}

impl OpenfilesError {
    /// HTTP status code reported by the service, if this error came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            OpenfilesError::Auth { status, .. }
            | OpenfilesError::NotFound { status, .. }
            | OpenfilesError::Service { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether repeating the same call may succeed without any change on the caller's side.
    ///
    /// Only transport failures, rate limiting and server-side (5xx) errors qualify.
    pub fn is_retryable(&self) -> bool {
        match self {
            OpenfilesError::Connection(_) => true,
            OpenfilesError::Service { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Result type alias for openfiles operations.
pub type Result<T> = std::result::Result<T, OpenfilesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_accessor() {
        let err = OpenfilesError::NotFound {
            status: 404,
            message: "Bag not found".to_string(),
        };
        assert_eq!(err.status(), Some(404));
        assert_eq!(OpenfilesError::SessionClosed.status(), None);
        assert_eq!(OpenfilesError::Schema("bag_id".into()).status(), None);
    }

    #[test]
    fn test_retry_classification() {
        assert!(OpenfilesError::Connection("refused".into()).is_retryable());
        assert!(
            OpenfilesError::Service {
                status: 503,
                message: String::new()
            }
            .is_retryable()
        );
        assert!(
            OpenfilesError::Service {
                status: 429,
                message: String::new()
            }
            .is_retryable()
        );
        assert!(
            !OpenfilesError::Service {
                status: 400,
                message: String::new()
            }
            .is_retryable()
        );
        assert!(
            !OpenfilesError::Auth {
                status: 401,
                message: String::new()
            }
            .is_retryable()
        );
        assert!(
            !OpenfilesError::NotFound {
                status: 404,
                message: String::new()
            }
            .is_retryable()
        );
        assert!(!OpenfilesError::SessionClosed.is_retryable());
    }

    #[test]
    fn test_display() {
        let err = OpenfilesError::Service {
            status: 500,
            message: "boom".into(),
        };
        assert_eq!(err.to_string(), "Service error (500): boom");
        let err = OpenfilesError::SourceNotFound(PathBuf::from("missing.txt"));
        assert_eq!(err.to_string(), "Source not found: missing.txt");
    }
}
