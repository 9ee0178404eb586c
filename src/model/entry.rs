use super::account::{is_valid_account_id, AccountId};
use serde::{Deserialize, Serialize};

/// Suffix appended to an identifier when its slot is tombstoned.
///
/// `:` is never part of a valid account id, so a tombstone can never be
/// mistaken for (or collide with) a live address.
pub const TOMBSTONE_SUFFIX: &str = ":X";

/// One slot of the registry.
///
/// # Lifecycle
/// Written once by the factory when a child is created. The only later write
/// is the tombstone that replaces it on removal; slots are never dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// External address of the child, or its tombstoned form.
    pub identifier: String,
    /// Logical time of the call that wrote this slot.
    pub created_at: u64,
    /// Caller that requested the write.
    pub creator: AccountId,
}

impl Entry {
    /// Creates the record for a newly registered child.
    pub fn new(identifier: &AccountId, created_at: u64, creator: AccountId) -> Self {
        Self {
            identifier: identifier.to_string(),
            created_at,
            creator,
        }
    }

    /// Creates the inert value that replaces `identifier`'s slot on removal.
    pub fn tombstone(identifier: &AccountId, removed_at: u64, remover: AccountId) -> Self {
        Self {
            identifier: format!("{identifier}{TOMBSTONE_SUFFIX}"),
            created_at: removed_at,
            creator: remover,
        }
    }

    /// Whether this slot still names a structurally valid external address.
    pub fn is_live(&self) -> bool {
        is_valid_account_id(&self.identifier)
    }
}
