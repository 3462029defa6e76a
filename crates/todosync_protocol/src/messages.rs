//! Request and response envelopes.

use crate::error::{ProtocolError, ProtocolResult};
use crate::operation::Operation;
use crate::payload::{ChecklistMap, InventoryMap, StateDocument};
use serde::{Deserialize, Serialize};

/// A request from a client.
///
/// The operation code is kept raw so that the server can authenticate a
/// request before rejecting an unknown operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    /// Operation code (`0` save, `1` load, `2` test).
    ///
    /// Any integer decodes; out-of-range codes are rejected by
    /// [`operation`](Self::operation).
    #[serde(rename = "type")]
    pub op_code: i64,
    /// Shared secret presented by the client.
    pub password: String,
    /// Checklist entries to save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checklist: Option<ChecklistMap>,
    /// Inventory entries to save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory: Option<InventoryMap>,
}

impl RequestEnvelope {
    fn bare(operation: Operation, password: impl Into<String>) -> Self {
        Self {
            op_code: operation.to_code(),
            password: password.into(),
            checklist: None,
            inventory: None,
        }
    }

    /// Creates a save request carrying the whole document.
    pub fn save(password: impl Into<String>, state: StateDocument) -> Self {
        Self {
            checklist: Some(state.checklist),
            inventory: Some(state.inventory),
            ..Self::bare(Operation::Save, password)
        }
    }

    /// Creates a load request.
    pub fn load(password: impl Into<String>) -> Self {
        Self::bare(Operation::Load, password)
    }

    /// Creates a connectivity test request.
    pub fn test(password: impl Into<String>) -> Self {
        Self::bare(Operation::Test, password)
    }

    /// Resolves the operation code.
    pub fn operation(&self) -> ProtocolResult<Operation> {
        Operation::try_from(self.op_code)
    }

    /// Encodes to JSON.
    pub fn encode(&self) -> ProtocolResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(ProtocolError::Encode)
    }

    /// Decodes from JSON.
    pub fn decode(bytes: &[u8]) -> ProtocolResult<Self> {
        serde_json::from_slice(bytes).map_err(ProtocolError::Malformed)
    }
}

/// A response from the server.
///
/// Data fields are only present on a successful load; `error` is only
/// present when the request could not be interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Whether the request was authenticated and carried out.
    pub success: bool,
    /// Checklist entries (load only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checklist: Option<ChecklistMap>,
    /// Inventory entries (load only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory: Option<InventoryMap>,
    /// Reason the request was rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResponseEnvelope {
    /// Creates a successful response without data.
    pub fn success() -> Self {
        Self {
            success: true,
            checklist: None,
            inventory: None,
            error: None,
        }
    }

    /// Creates the response for a request with the wrong secret.
    pub fn denied() -> Self {
        Self {
            success: false,
            ..Self::success()
        }
    }

    /// Creates a successful response carrying the full state.
    pub fn with_state(state: StateDocument) -> Self {
        Self {
            checklist: Some(state.checklist),
            inventory: Some(state.inventory),
            ..Self::success()
        }
    }

    /// Creates a failed response describing why the request was rejected.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::denied()
        }
    }

    /// Returns true if the response carries any data field.
    pub fn has_state(&self) -> bool {
        self.checklist.is_some() || self.inventory.is_some()
    }

    /// Takes the state out of a load response. Absent collections are empty.
    pub fn into_state(self) -> StateDocument {
        StateDocument {
            checklist: self.checklist.unwrap_or_default(),
            inventory: self.inventory.unwrap_or_default(),
        }
    }

    /// Encodes to JSON.
    pub fn encode(&self) -> ProtocolResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(ProtocolError::Encode)
    }

    /// Decodes from JSON.
    pub fn decode(bytes: &[u8]) -> ProtocolResult<Self> {
        serde_json::from_slice(bytes).map_err(ProtocolError::Malformed)
    }
}
