//! # Mock Executor
//!
//! Scripted stand-in for the execution environment.
//!
//! | Feature | MockExecutor | Sandbox |
//! |---------|--------------|---------|
//! | **Outcome** | Whatever the test scripted | Derived from ledger state |
//! | **Determinism** | 100% deterministic | Deterministic per ledger |
//! | **Use Case** | Forcing failure paths, asserting issued batches | End-to-end flows |
//!
//! Expectations are consumed in FIFO order, one per executed batch. A batch
//! arriving with no expectation left, or addressed to a different receiver
//! than expected, panics.
//!
//! ```rust
//! use dao_factory::executor::{Executor, MockExecutor};
//! use dao_factory::model::{Outcome, PromiseBatch, Ticket};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockExecutor::new();
//!     mock.expect_batch("alice.test").fails("account exists");
//!
//!     let batch = PromiseBatch::create(Ticket(1), "alice.test".parse().unwrap()).create_account();
//!     let receipt = mock.execute(&batch).await;
//!
//!     assert_eq!(receipt.outcome, Outcome::Failed("account exists".into()));
//!     assert_eq!(mock.executed(), vec![batch]);
//!     mock.verify();
//! }
//! ```

use super::{Executor, Receipt};
use crate::model::{Outcome, PromiseBatch};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// One scripted outcome.
struct Expectation {
    /// Expected receiver, or `None` to accept any.
    receiver: Option<String>,
    outcome: Outcome,
}

#[derive(Default)]
struct MockState {
    expectations: VecDeque<Expectation>,
    executed: Vec<PromiseBatch>,
}

/// Executor that replays scripted outcomes and records every batch it sees.
#[derive(Clone, Default)]
pub struct MockExecutor {
    state: Arc<Mutex<MockState>>,
    clock: Arc<AtomicU64>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects the next batch to be addressed to `receiver`.
    pub fn expect_batch(&self, receiver: &str) -> ExpectationBuilder {
        ExpectationBuilder {
            receiver: Some(receiver.to_string()),
            state: self.state.clone(),
        }
    }

    /// Expects a next batch, whatever its receiver.
    pub fn expect_any(&self) -> ExpectationBuilder {
        ExpectationBuilder {
            receiver: None,
            state: self.state.clone(),
        }
    }

    /// Batches executed so far, in order.
    pub fn executed(&self) -> Vec<PromiseBatch> {
        self.state.lock().unwrap().executed.clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let state = self.state.lock().unwrap();
        if !state.expectations.is_empty() {
            panic!(
                "Not all expectations were met. {} remaining",
                state.expectations.len()
            );
        }
    }
}

#[async_trait]
impl Executor for MockExecutor {
    async fn execute(&self, batch: &PromiseBatch) -> Receipt {
        let mut state = self.state.lock().unwrap();
        let expectation = state
            .expectations
            .pop_front()
            .unwrap_or_else(|| panic!("Unexpected batch for {}", batch.receiver));

        if let Some(receiver) = &expectation.receiver {
            assert_eq!(
                receiver.as_str(),
                batch.receiver.as_str(),
                "Batch addressed to an unexpected receiver"
            );
        }
        state.executed.push(batch.clone());

        Receipt {
            block_timestamp: self.clock.fetch_add(1, Ordering::SeqCst) + 1,
            outcome: expectation.outcome,
        }
    }
}

/// Builder for a scripted outcome.
pub struct ExpectationBuilder {
    receiver: Option<String>,
    state: Arc<Mutex<MockState>>,
}

impl ExpectationBuilder {
    /// The batch will be reported as successful.
    pub fn succeeds(self) {
        self.push(Outcome::Succeeded);
    }

    /// The batch will be reported as failed with `reason`.
    pub fn fails(self, reason: &str) {
        self.push(Outcome::Failed(reason.to_string()));
    }

    fn push(self, outcome: Outcome) {
        self.state.lock().unwrap().expectations.push_back(Expectation {
            receiver: self.receiver,
            outcome,
        });
    }
}
