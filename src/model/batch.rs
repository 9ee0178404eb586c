//! Deferred actions.
//!
//! The factory never touches external accounts itself. It describes what should
//! happen as a [`PromiseBatch`] and hands that description to the execution
//! environment, which runs it later and out of band.
//!
//! ```rust
//! use dao_factory::model::{AccountId, BatchAction, Payload, PromiseBatch, Ticket};
//!
//! let receiver: AccountId = "alice.test".parse().unwrap();
//! let batch = PromiseBatch::create(Ticket(1), receiver)
//!     .create_account()
//!     .deploy_contract(Payload::from_bytes(vec![0, 97, 115, 109]))
//!     .transfer(10);
//!
//! assert_eq!(batch.actions.len(), 3);
//! assert!(matches!(batch.actions[2], BatchAction::Transfer(10)));
//! ```

use super::account::{AccountId, Balance};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};
use std::sync::Arc;

/// Correlates an issued batch with the outcome reported for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Ticket(pub u64);

impl From<u64> for Ticket {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl Display for Ticket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ticket_{}", self.0)
    }
}

/// The opaque code deployed to every child.
///
/// Supplied by the build pipeline; cloning shares the underlying bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct Payload(Arc<[u8]>);

impl Payload {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Arc::from(bytes.into()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Debug for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Payload({} bytes)", self.0.len())
    }
}

/// A single step of a [`PromiseBatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchAction {
    /// Create the receiver account.
    CreateAccount,
    /// Deploy the payload to the receiver.
    DeployContract(Payload),
    /// Move value to the receiver.
    Transfer(Balance),
    /// Delete the receiver, sending its residual balance to `beneficiary`.
    DeleteAccount { beneficiary: AccountId },
}

/// An ordered batch of steps addressed to one account.
///
/// The environment is expected to apply the steps all-or-nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromiseBatch {
    pub ticket: Ticket,
    pub receiver: AccountId,
    pub actions: Vec<BatchAction>,
}

impl PromiseBatch {
    pub fn create(ticket: Ticket, receiver: AccountId) -> Self {
        Self {
            ticket,
            receiver,
            actions: Vec::new(),
        }
    }

    pub fn create_account(self) -> Self {
        self.push(BatchAction::CreateAccount)
    }

    pub fn deploy_contract(self, payload: Payload) -> Self {
        self.push(BatchAction::DeployContract(payload))
    }

    pub fn transfer(self, amount: Balance) -> Self {
        self.push(BatchAction::Transfer(amount))
    }

    pub fn delete_account(self, beneficiary: AccountId) -> Self {
        self.push(BatchAction::DeleteAccount { beneficiary })
    }

    fn push(mut self, action: BatchAction) -> Self {
        self.actions.push(action);
        self
    }
}

/// How the environment reports a batch it has finished with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    Failed(String),
}
