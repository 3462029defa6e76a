//! Error types for the sync server.

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;
use todosync_protocol::ProtocolError;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur in the sync server.
#[derive(Error, Debug)]
pub enum ServerError {
    /// The request body is not a valid envelope.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The request names an operation the server does not know.
    #[error("invalid operation: {0}")]
    InvalidOperation(i64),

    /// The shared-secret file does not exist.
    #[error("secret file not found: {}", path.display())]
    SecretNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The snapshot file exists but could not be decoded.
    #[error("failed to decode snapshot {}: {message}", path.display())]
    SnapshotDecode {
        /// Snapshot path.
        path: PathBuf,
        /// Decoder message.
        message: String,
    },

    /// The listening socket could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Requested address.
        addr: SocketAddr,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    /// Returns true if this is a client error (4xx).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ServerError::InvalidRequest(_) | ServerError::InvalidOperation(_)
        )
    }

    /// Returns true if this is a server error (5xx).
    pub fn is_server_error(&self) -> bool {
        !self.is_client_error()
    }
}

impl From<ProtocolError> for ServerError {
    fn from(err: ProtocolError) -> Self {
        match err {
            ProtocolError::UnknownOperation(code) => ServerError::InvalidOperation(code),
            ProtocolError::Malformed(e) => ServerError::InvalidRequest(e.to_string()),
            ProtocolError::Encode(e) => ServerError::Internal(e.to_string()),
        }
    }
}
