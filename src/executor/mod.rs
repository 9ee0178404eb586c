//! # Execution Environment
//!
//! The external collaborator that actually creates, funds and deletes accounts.
//! The factory only *describes* that work as [`PromiseBatch`]es; an [`Executor`]
//! runs them, later and out of band, and reports a [`Receipt`].
//!
//! Two implementations ship with the crate:
//!
//! - [`Sandbox`] - an in-memory account ledger with realistic failure modes
//!   (name collisions, missing accounts, underfunded creations)
//! - [`MockExecutor`] - scripted outcomes for tests, see the [`mock`] module

pub mod mock;
pub mod sandbox;

pub use mock::MockExecutor;
pub use sandbox::{Sandbox, SandboxAccount};

use crate::model::{Outcome, PromiseBatch};
use async_trait::async_trait;

/// What the environment reports once it is done with a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Logical time at which the batch settled.
    pub block_timestamp: u64,
    pub outcome: Outcome,
}

#[async_trait]
pub trait Executor: Send + Sync + 'static {
    /// Runs every step of `batch` all-or-nothing.
    async fn execute(&self, batch: &PromiseBatch) -> Receipt;
}
