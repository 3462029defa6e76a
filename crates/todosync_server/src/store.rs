//! In-memory checklist and inventory state.

use parking_lot::Mutex;
use std::collections::HashMap;
use todosync_protocol::{
    ChecklistMap, ChecklistPayload, InventoryMap, InventoryPayload, StateDocument,
};

/// A named boolean toggle item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistEntry {
    /// Unique name.
    pub name: String,
    /// Whether the item is ticked.
    pub checked: bool,
    /// Opaque ordering hint.
    pub index: i64,
}

/// A named item with a current count and an unenforced capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryEntry {
    /// Unique name.
    pub name: String,
    /// Current count.
    pub current: i64,
    /// Soft capacity.
    pub max: i64,
    /// Opaque ordering hint.
    pub index: i64,
}

/// A copy of the store taken under its lock.
#[derive(Debug, Clone, PartialEq)]
pub struct StateSnapshot {
    /// Mutation generation the copy was taken at.
    pub generation: u64,
    /// The copied state.
    pub document: StateDocument,
}

#[derive(Default)]
struct StoreState {
    checklist: HashMap<String, ChecklistEntry>,
    inventory: HashMap<String, InventoryEntry>,
    generation: u64,
}

impl StoreState {
    fn upsert_checklist(&mut self, name: String, payload: ChecklistPayload) {
        let entry = ChecklistEntry {
            name: name.clone(),
            checked: payload.checked,
            index: payload.index,
        };
        self.checklist.insert(name, entry);
    }

    fn upsert_inventory(&mut self, name: String, payload: InventoryPayload) {
        let entry = InventoryEntry {
            name: name.clone(),
            current: payload.current,
            max: payload.max,
            index: payload.index,
        };
        self.inventory.insert(name, entry);
    }

    fn clear(&mut self) {
        self.checklist.clear();
        self.inventory.clear();
    }

    // Keys are taken from the entry names so they always agree.
    fn snapshot(&self) -> StateSnapshot {
        let checklist = self
            .checklist
            .values()
            .map(|e| (e.name.clone(), ChecklistPayload::new(e.checked, e.index)))
            .collect();
        let inventory = self
            .inventory
            .values()
            .map(|e| {
                (
                    e.name.clone(),
                    InventoryPayload::new(e.current, e.max, e.index),
                )
            })
            .collect();

        StateSnapshot {
            generation: self.generation,
            document: StateDocument {
                checklist,
                inventory,
            },
        }
    }
}

/// The live checklist and inventory collections.
///
/// All reads and writes go through a single lock, so a batch of upserts is
/// never observed half-applied. Entries are only ever removed by [`clear`]
/// or [`replace_with`].
///
/// [`clear`]: StateStore::clear
/// [`replace_with`]: StateStore::replace_with
#[derive(Default)]
pub struct StateStore {
    state: Mutex<StoreState>,
}

impl StateStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every checklist and inventory entry.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.clear();
        state.generation += 1;
    }

    /// Inserts or replaces the checklist entry for `name`.
    pub fn upsert_checklist(&self, name: impl Into<String>, checked: bool, index: i64) {
        let mut state = self.state.lock();
        state.upsert_checklist(name.into(), ChecklistPayload::new(checked, index));
        state.generation += 1;
    }

    /// Inserts or replaces the inventory entry for `name`.
    pub fn upsert_inventory(&self, name: impl Into<String>, current: i64, max: i64, index: i64) {
        let mut state = self.state.lock();
        state.upsert_inventory(name.into(), InventoryPayload::new(current, max, index));
        state.generation += 1;
    }

    /// Applies one save request's entries and returns the resulting state.
    ///
    /// The upserts and the returned copy happen under one lock acquisition.
    /// Absent collections contribute no upserts.
    pub fn apply(
        &self,
        checklist: Option<ChecklistMap>,
        inventory: Option<InventoryMap>,
    ) -> StateSnapshot {
        let mut state = self.state.lock();
        for (name, payload) in checklist.into_iter().flatten() {
            state.upsert_checklist(name, payload);
        }
        for (name, payload) in inventory.into_iter().flatten() {
            state.upsert_inventory(name, payload);
        }
        state.generation += 1;
        state.snapshot()
    }

    /// Replaces the whole state with a loaded document.
    pub fn replace_with(&self, document: StateDocument) {
        let mut state = self.state.lock();
        state.clear();
        for (name, payload) in document.checklist {
            state.upsert_checklist(name, payload);
        }
        for (name, payload) in document.inventory {
            state.upsert_inventory(name, payload);
        }
        state.generation += 1;
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> StateSnapshot {
        self.state.lock().snapshot()
    }

    /// Returns the checklist entry for `name`, if any.
    pub fn checklist_entry(&self, name: &str) -> Option<ChecklistEntry> {
        self.state.lock().checklist.get(name).cloned()
    }

    /// Returns the inventory entry for `name`, if any.
    pub fn inventory_entry(&self, name: &str) -> Option<InventoryEntry> {
        self.state.lock().inventory.get(name).cloned()
    }

    /// Returns the number of (checklist, inventory) entries.
    pub fn len(&self) -> (usize, usize) {
        let state = self.state.lock();
        (state.checklist.len(), state.inventory.len())
    }

    /// Returns true if both collections are empty.
    pub fn is_empty(&self) -> bool {
        self.len() == (0, 0)
    }
}
