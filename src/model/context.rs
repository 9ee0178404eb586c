use super::account::{AccountId, Balance};

/// Ambient facts about the call being processed.
///
/// The execution environment supplies these with every request; passing them
/// explicitly keeps the factory free of global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    /// Identity of the immediate caller.
    pub predecessor: AccountId,
    /// Value attached to the call.
    pub attached_deposit: Balance,
    /// Monotonic logical time of the call.
    pub block_timestamp: u64,
}

impl CallContext {
    pub fn new(predecessor: AccountId, attached_deposit: Balance, block_timestamp: u64) -> Self {
        Self {
            predecessor,
            attached_deposit,
            block_timestamp,
        }
    }

    /// Context for a callback the factory receives from itself once a batch settles.
    pub fn callback(factory: AccountId, block_timestamp: u64) -> Self {
        Self::new(factory, 0, block_timestamp)
    }
}
