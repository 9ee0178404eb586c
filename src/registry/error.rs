//! Error types for the registry.

use thiserror::Error;

/// Errors that can occur during registry operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The identifier is not live (never registered, or tombstoned).
    #[error("Entry not found: {0}")]
    NotFound(String),

    /// The identifier already occupies a live slot.
    #[error("Entry already live: {identifier} at slot {slot}")]
    AlreadyLive { identifier: String, slot: usize },

    /// Only entries naming a valid address may be appended.
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// A tombstone must never resolve to a real address.
    #[error("Tombstone names a live address: {0}")]
    LiveTombstone(String),

    /// The requested slot range is outside `0..=len`.
    #[error("Invalid range {start}..{end} for registry of length {len}")]
    InvalidRange { start: usize, end: usize, len: usize },
}
