//! Error types for factory operations.

use crate::model::{Balance, Ticket};
use crate::registry::RegistryError;
use thiserror::Error;

/// Errors that abort a factory call.
///
/// Every variant is raised before any state is touched, so a failed call never
/// leaves a partial registry mutation or an issued batch behind.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FactoryError {
    /// The attached value does not cover the requested deposit.
    #[error("not enough deposit was attached: attached {attached}, required {required}")]
    InsufficientDeposit { attached: Balance, required: Balance },

    /// The child identifier is not a valid external address.
    #[error("not a valid account: {0}")]
    InvalidAccount(String),

    /// The beneficiary is not a valid external address.
    #[error("not a valid beneficiary account: {0}")]
    InvalidBeneficiary(String),

    /// The identifier is not live, so there is nothing to delete.
    #[error("dao does not exist - can not delete: {0}")]
    NotFound(String),

    /// The identifier is already live.
    #[error("dao already registered: {0}")]
    AlreadyRegistered(String),

    /// The identifier was deleted before and can never be created again.
    #[error("dao name was retired by a previous deletion: {0}")]
    Retired(String),

    /// Outcomes may only be reported by the factory's own account.
    #[error("only the factory may report batch outcomes, not {0}")]
    Unauthorized(String),

    /// No issued batch carries this ticket (never issued, or already resolved).
    #[error("unknown ticket: {0}")]
    UnknownTicket(Ticket),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
