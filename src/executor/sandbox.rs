//! In-memory stand-in for the account-lifecycle environment.

use super::{Executor, Receipt};
use crate::model::{AccountId, Balance, BatchAction, Outcome, PromiseBatch};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// State of one account in the [`Sandbox`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SandboxAccount {
    pub balance: Balance,
    /// Size of the deployed code, if any.
    pub code_len: Option<usize>,
}

/// An account ledger that applies batches atomically.
///
/// Each batch runs against a scratch copy of the ledger, which replaces the
/// real one only if every step succeeds:
///
/// - `CreateAccount` fails if the account already exists;
/// - `DeployContract` and `DeleteAccount` fail if it does not;
/// - `Transfer` credits the receiver;
/// - any credit that would overflow a balance fails the batch;
/// - `DeleteAccount` credits the residual balance to the beneficiary when it
///   exists (otherwise the balance is burned);
/// - a batch that creates an account fails if the account ends up holding less
///   than `min_deposit`.
pub struct Sandbox {
    accounts: Mutex<HashMap<AccountId, SandboxAccount>>,
    min_deposit: Balance,
    clock: AtomicU64,
}

impl Sandbox {
    pub fn new(min_deposit: Balance) -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            min_deposit,
            clock: AtomicU64::new(0),
        }
    }

    /// Seeds an account, e.g. a beneficiary or a name that is already taken.
    pub async fn insert_account(&self, id: AccountId, balance: Balance) {
        self.accounts.lock().await.insert(
            id,
            SandboxAccount {
                balance,
                code_len: None,
            },
        );
    }

    pub async fn account(&self, id: &AccountId) -> Option<SandboxAccount> {
        self.accounts.lock().await.get(id).cloned()
    }

    fn apply(
        &self,
        ledger: &mut HashMap<AccountId, SandboxAccount>,
        batch: &PromiseBatch,
    ) -> Result<(), String> {
        let receiver = &batch.receiver;
        let mut created = false;

        for action in &batch.actions {
            match action {
                BatchAction::CreateAccount => {
                    if ledger.contains_key(receiver) {
                        return Err(format!("account {receiver} already exists"));
                    }
                    ledger.insert(receiver.clone(), SandboxAccount::default());
                    created = true;
                }
                BatchAction::DeployContract(payload) => {
                    let account = ledger
                        .get_mut(receiver)
                        .ok_or_else(|| format!("cannot deploy to missing account {receiver}"))?;
                    account.code_len = Some(payload.len());
                }
                BatchAction::Transfer(amount) => {
                    let account = ledger
                        .get_mut(receiver)
                        .ok_or_else(|| format!("cannot transfer to missing account {receiver}"))?;
                    account.balance = account
                        .balance
                        .checked_add(*amount)
                        .ok_or_else(|| format!("balance overflow on {receiver}"))?;
                }
                BatchAction::DeleteAccount { beneficiary } => {
                    let account = ledger
                        .remove(receiver)
                        .ok_or_else(|| format!("cannot delete missing account {receiver}"))?;
                    match ledger.get_mut(beneficiary) {
                        Some(target) => {
                            target.balance = target
                                .balance
                                .checked_add(account.balance)
                                .ok_or_else(|| format!("balance overflow on {beneficiary}"))?;
                        }
                        None => warn!(%beneficiary, burned = account.balance, "Beneficiary missing"),
                    }
                }
            }
        }

        if created {
            let balance = ledger.get(receiver).map_or(0, |a| a.balance);
            if balance < self.min_deposit {
                return Err(format!(
                    "insufficient deposit for {receiver}: {balance} < {}",
                    self.min_deposit
                ));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Executor for Sandbox {
    async fn execute(&self, batch: &PromiseBatch) -> Receipt {
        let block_timestamp = self.clock.fetch_add(1, Ordering::SeqCst) + 1;
        let mut accounts = self.accounts.lock().await;
        let mut scratch = accounts.clone();

        let outcome = match self.apply(&mut scratch, batch) {
            Ok(()) => {
                *accounts = scratch;
                info!(ticket = %batch.ticket, receiver = %batch.receiver, "Batch applied");
                Outcome::Succeeded
            }
            Err(reason) => {
                debug!(ticket = %batch.ticket, %reason, "Batch failed");
                Outcome::Failed(reason)
            }
        };

        Receipt {
            block_timestamp,
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Payload, Ticket};

    fn account(id: &str) -> AccountId {
        AccountId::parse(id).unwrap()
    }

    fn creation(id: &str, amount: Balance) -> PromiseBatch {
        PromiseBatch::create(Ticket(1), account(id))
            .create_account()
            .deploy_contract(Payload::from_bytes(vec![1, 2, 3]))
            .transfer(amount)
    }

    #[tokio::test]
    async fn creates_funds_and_deploys() {
        let sandbox = Sandbox::new(5);

        let receipt = sandbox.execute(&creation("alice.test", 10)).await;

        assert_eq!(receipt.outcome, Outcome::Succeeded);
        assert_eq!(receipt.block_timestamp, 1);
        assert_eq!(
            sandbox.account(&account("alice.test")).await,
            Some(SandboxAccount {
                balance: 10,
                code_len: Some(3)
            })
        );
    }

    #[tokio::test]
    async fn failed_batch_leaves_ledger_untouched() {
        let sandbox = Sandbox::new(5);

        let receipt = sandbox.execute(&creation("alice.test", 4)).await;

        assert!(matches!(receipt.outcome, Outcome::Failed(_)));
        assert_eq!(sandbox.account(&account("alice.test")).await, None);
    }

    #[tokio::test]
    async fn rejects_existing_account() {
        let sandbox = Sandbox::new(0);
        sandbox.insert_account(account("alice.test"), 1).await;

        let receipt = sandbox.execute(&creation("alice.test", 10)).await;

        assert!(matches!(&receipt.outcome, Outcome::Failed(reason) if reason.contains("already exists")));
        assert_eq!(sandbox.account(&account("alice.test")).await.unwrap().balance, 1);
    }

    #[tokio::test]
    async fn deletion_pays_beneficiary() {
        let sandbox = Sandbox::new(0);
        sandbox.insert_account(account("alice.test"), 7).await;
        sandbox.insert_account(account("charlie.test"), 1).await;

        let batch = PromiseBatch::create(Ticket(2), account("alice.test"))
            .delete_account(account("charlie.test"));
        let receipt = sandbox.execute(&batch).await;

        assert_eq!(receipt.outcome, Outcome::Succeeded);
        assert_eq!(sandbox.account(&account("alice.test")).await, None);
        assert_eq!(sandbox.account(&account("charlie.test")).await.unwrap().balance, 8);
    }

    #[tokio::test]
    async fn deleting_missing_account_fails() {
        let sandbox = Sandbox::new(0);
        let batch = PromiseBatch::create(Ticket(3), account("ghost.test"))
            .delete_account(account("charlie.test"));

        let receipt = sandbox.execute(&batch).await;

        assert!(matches!(receipt.outcome, Outcome::Failed(_)));
    }

    #[tokio::test]
    async fn overflowing_payout_fails_atomically() {
        let sandbox = Sandbox::new(0);
        sandbox.insert_account(account("alice.test"), 10).await;
        sandbox.insert_account(account("charlie.test"), Balance::MAX).await;

        let batch = PromiseBatch::create(Ticket(4), account("alice.test"))
            .delete_account(account("charlie.test"));
        let receipt = sandbox.execute(&batch).await;

        assert!(matches!(&receipt.outcome, Outcome::Failed(reason) if reason.contains("overflow")));
        assert_eq!(sandbox.account(&account("alice.test")).await.unwrap().balance, 10);
        assert_eq!(
            sandbox.account(&account("charlie.test")).await.unwrap().balance,
            Balance::MAX
        );
    }

    #[tokio::test]
    async fn overflowing_transfer_fails_atomically() {
        let sandbox = Sandbox::new(0);
        sandbox.insert_account(account("alice.test"), Balance::MAX).await;

        let batch = PromiseBatch::create(Ticket(5), account("alice.test")).transfer(1);
        let receipt = sandbox.execute(&batch).await;

        assert!(matches!(receipt.outcome, Outcome::Failed(_)));
        assert_eq!(
            sandbox.account(&account("alice.test")).await.unwrap().balance,
            Balance::MAX
        );
    }
}
