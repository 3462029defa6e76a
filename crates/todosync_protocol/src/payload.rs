//! Entry payloads shared by the wire protocol and the snapshot file.

use crate::error::{ProtocolError, ProtocolResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Checklist entries keyed by name.
pub type ChecklistMap = BTreeMap<String, ChecklistPayload>;

/// Inventory entries keyed by name.
pub type InventoryMap = BTreeMap<String, InventoryPayload>;

/// A checklist entry as carried on the wire. The name is the map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistPayload {
    /// Whether the item is ticked.
    pub checked: bool,
    /// Opaque client-side ordering hint, round-tripped unchanged.
    #[serde(default)]
    pub index: i64,
}

impl ChecklistPayload {
    /// Creates a checklist payload.
    pub fn new(checked: bool, index: i64) -> Self {
        Self { checked, index }
    }
}

/// An inventory entry as carried on the wire. The name is the map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryPayload {
    /// Current count.
    pub current: i64,
    /// Soft capacity; never enforced.
    pub max: i64,
    /// Opaque client-side ordering hint, round-tripped unchanged.
    #[serde(default)]
    pub index: i64,
}

impl InventoryPayload {
    /// Creates an inventory payload.
    pub fn new(current: i64, max: i64, index: i64) -> Self {
        Self {
            current,
            max,
            index,
        }
    }
}

/// The full checklist and inventory state.
///
/// This is the body of a successful load response and the exact layout of
/// the persisted snapshot file. Maps are ordered so encoded output is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDocument {
    /// Checklist entries.
    #[serde(default)]
    pub checklist: ChecklistMap,
    /// Inventory entries.
    #[serde(default)]
    pub inventory: InventoryMap,
}

impl StateDocument {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a checklist entry, replacing any entry with the same name.
    pub fn with_checklist(mut self, name: impl Into<String>, checked: bool, index: i64) -> Self {
        self.checklist
            .insert(name.into(), ChecklistPayload::new(checked, index));
        self
    }

    /// Adds an inventory entry, replacing any entry with the same name.
    pub fn with_inventory(
        mut self,
        name: impl Into<String>,
        current: i64,
        max: i64,
        index: i64,
    ) -> Self {
        self.inventory
            .insert(name.into(), InventoryPayload::new(current, max, index));
        self
    }

    /// Returns true if both collections are empty.
    pub fn is_empty(&self) -> bool {
        self.checklist.is_empty() && self.inventory.is_empty()
    }

    /// Encodes as indented JSON, the snapshot file format.
    pub fn encode_pretty(&self) -> ProtocolResult<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(ProtocolError::Encode)
    }

    /// Decodes from JSON.
    pub fn decode(bytes: &[u8]) -> ProtocolResult<Self> {
        serde_json::from_slice(bytes).map_err(ProtocolError::Malformed)
    }
}
