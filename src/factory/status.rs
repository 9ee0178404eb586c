//! Lifecycle states and bookkeeping records for child units.

use crate::model::{AccountId, Ticket};
use serde::{Deserialize, Serialize};

/// Where a child unit is in its lifecycle.
///
/// ```text
/// Unregistered -> PendingCreate -> Live -> PendingDelete -> Removed
///                       |
///                       +-> Unregistered  (creation failed, slot tombstoned)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChildStatus {
    /// Never registered, or registered and rolled back.
    Unregistered,
    /// Registered; the creation batch has not been acknowledged yet.
    PendingCreate,
    /// Registered and acknowledged.
    Live,
    /// Tombstoned; the deletion batch has not been acknowledged yet.
    PendingDelete,
    /// Tombstoned for good. The name can never be created again.
    Removed,
}

/// Which half of the lifecycle an issued batch belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingKind {
    Create,
    Delete,
}

/// An issued batch whose outcome has not been reported yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAction {
    pub ticket: Ticket,
    pub kind: PendingKind,
    pub identifier: AccountId,
    /// Slot the identifier held when the batch was issued.
    pub slot: usize,
}

/// A deleted child whose account deletion was reported as failed.
///
/// Its slot stays tombstoned, so the account keeps existing outside the registry
/// with whatever balance it still holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Orphan {
    pub identifier: AccountId,
    pub slot: usize,
    pub reason: String,
}

/// What [`Factory::resolve`](super::Factory::resolve) did with a reported outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The batch succeeded; the optimistic registry state stands.
    Confirmed,
    /// Creation failed; the slot was tombstoned and the name released.
    RolledBack { slot: usize },
    /// The child was deleted while its creation was in flight and the creation
    /// failed, so neither outcome changes anything. Reported for both batches.
    Superseded,
    /// Deletion failed; the account is recorded as an [`Orphan`].
    Orphaned,
}
