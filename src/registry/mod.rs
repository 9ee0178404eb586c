//! # Registry
//!
//! An append-only, index-addressable list of [`Entry`] records plus a lookup
//! from identifier to slot.
//!
//! ## Invariants
//!
//! - Every `(identifier, slot)` pair in the lookup points at an entry carrying
//!   that identifier.
//! - The slot list only grows. Removal overwrites a slot with a tombstone and
//!   drops the lookup pair, so every slot number handed out stays valid.
//! - The lookup only ever contains live identifiers.
//!
//! Every mutating call either succeeds completely or leaves the registry
//! untouched.

pub mod error;

pub use error::*;

use crate::model::{is_valid_account_id, Entry};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Default, Clone)]
pub struct Registry {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots, tombstones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Slot of a live identifier.
    pub fn index_of(&self, identifier: &str) -> Option<usize> {
        self.index.get(identifier).copied()
    }

    /// Raw slot content, tombstones included.
    pub fn get(&self, slot: usize) -> Option<&Entry> {
        self.entries.get(slot)
    }

    /// Appends `entry` at slot `len()` and makes its identifier live.
    pub fn append(&mut self, entry: Entry) -> Result<usize, RegistryError> {
        if !is_valid_account_id(&entry.identifier) {
            return Err(RegistryError::InvalidIdentifier(entry.identifier));
        }
        if let Some(slot) = self.index_of(&entry.identifier) {
            return Err(RegistryError::AlreadyLive {
                identifier: entry.identifier,
                slot,
            });
        }

        let slot = self.entries.len();
        self.index.insert(entry.identifier.clone(), slot);
        self.entries.push(entry);
        debug!(slot, len = self.entries.len(), "Appended");
        Ok(slot)
    }

    /// Live entries in slots `start..end`, in slot order.
    pub fn list_range(&self, start: usize, end: usize) -> Result<Vec<Entry>, RegistryError> {
        let len = self.entries.len();
        if start > end || end > len {
            return Err(RegistryError::InvalidRange { start, end, len });
        }

        Ok(self.entries[start..end]
            .iter()
            .filter(|entry| entry.is_live())
            .cloned()
            .collect())
    }

    /// Overwrites a live identifier's slot with `tombstone` and drops it from the lookup.
    pub fn remove_live(&mut self, identifier: &str, tombstone: Entry) -> Result<usize, RegistryError> {
        if tombstone.is_live() {
            return Err(RegistryError::LiveTombstone(tombstone.identifier));
        }
        let slot = self
            .index
            .remove(identifier)
            .ok_or_else(|| RegistryError::NotFound(identifier.to_string()))?;

        self.entries[slot] = tombstone;
        debug!(slot, identifier, "Tombstoned");
        Ok(slot)
    }
}
