//! Operation codes.

use crate::error::{ProtocolError, ProtocolResult};

/// The operation requested by a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Merge the supplied entries into the server state and persist it.
    Save,
    /// Return the full server state.
    Load,
    /// Check the shared secret without transferring any state.
    Test,
}

impl Operation {
    /// Converts to the numeric code used in the `type` field.
    pub fn to_code(&self) -> i64 {
        match self {
            Operation::Save => 0,
            Operation::Load => 1,
            Operation::Test => 2,
        }
    }

    /// Converts from a numeric code.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Operation::Save),
            1 => Some(Operation::Load),
            2 => Some(Operation::Test),
            _ => None,
        }
    }

    /// Returns the lowercase operation name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Save => "save",
            Operation::Load => "load",
            Operation::Test => "test",
        }
    }
}

impl TryFrom<i64> for Operation {
    type Error = ProtocolError;

    fn try_from(code: i64) -> ProtocolResult<Self> {
        Self::from_code(code).ok_or(ProtocolError::UnknownOperation(code))
    }
}
