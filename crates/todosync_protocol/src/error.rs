//! Error types for the protocol crate.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors raised while encoding or interpreting protocol messages.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// The body is not a valid envelope.
    #[error("malformed message: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The `type` field holds a code outside the known operations.
    #[error("unknown operation code: {0}")]
    UnknownOperation(i64),

    /// The message could not be serialized.
    #[error("failed to encode message: {0}")]
    Encode(#[source] serde_json::Error),
}
