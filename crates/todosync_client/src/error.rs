//! Error types for the sync client.

use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur while talking to the server.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Network or transport error.
    #[error("transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
        /// Whether the operation can be retried.
        retryable: bool,
    },

    /// The server's reply could not be decoded, or the request not encoded.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The server rejected the shared secret.
    #[error("authentication failed: server rejected the secret")]
    AuthenticationFailed,

    /// The server could not interpret the request.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Creates a retryable transport error.
    pub fn transport_retryable(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: true,
        }
    }

    /// Creates a non-retryable transport error.
    pub fn transport_fatal(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: false,
        }
    }

    /// Returns true if this error can be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::Transport { retryable: true, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_errors() {
        assert!(ClientError::transport_retryable("connection refused").is_retryable());
        assert!(!ClientError::transport_fatal("bad url").is_retryable());
        assert!(!ClientError::AuthenticationFailed.is_retryable());
    }

    #[test]
    fn error_display() {
        let err = ClientError::Rejected("invalid operation: 9".into());
        assert_eq!(err.to_string(), "request rejected: invalid operation: 9");
    }
}
