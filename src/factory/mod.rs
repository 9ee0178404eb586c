//! # Factory
//!
//! Creates and deletes child units by pairing a [`Registry`] mutation with a
//! [`PromiseBatch`] for the execution environment.
//!
//! ## Optimistic mutation
//!
//! The registry is updated *before* the environment runs the batch: a created
//! child is visible through [`Factory::get_dao_index`] as soon as
//! [`Factory::create_dao`] returns. Every issued batch is remembered under its
//! [`Ticket`] until the environment reports back through [`Factory::resolve`]:
//!
//! - a failed creation tombstones the optimistic slot again;
//! - a failed deletion cannot be undone (tombstones are permanent) and is
//!   recorded as an [`Orphan`] instead.
//!
//! If the environment never reports back, the optimistic state simply stands.
//! [`Factory::status`] tells pending and settled children apart.
//!
//! ## Usage
//!
//! ```rust
//! use dao_factory::factory::{ChildStatus, Factory, Resolution};
//! use dao_factory::model::{AccountId, CallContext, Outcome, Payload};
//!
//! let factory_id: AccountId = "factory.test".parse().unwrap();
//! let mut factory = Factory::new(factory_id, Payload::from_bytes(vec![0u8; 8]));
//!
//! let ctx = CallContext::new("caller.test".parse().unwrap(), 10, 1);
//! let batch = factory.create_dao(&ctx, "alice.test", 5).unwrap();
//! assert_eq!(factory.get_dao_index("alice.test"), Some(0));
//! assert_eq!(factory.status("alice.test"), ChildStatus::PendingCreate);
//!
//! let callback = CallContext::callback(factory.account_id().clone(), 2);
//! let resolution = factory.resolve(&callback, batch.ticket, Outcome::Succeeded).unwrap();
//! assert_eq!(resolution, Resolution::Confirmed);
//! assert_eq!(factory.status("alice.test"), ChildStatus::Live);
//! ```

pub mod error;
pub mod status;

pub use error::*;
pub use status::*;

use crate::model::{AccountId, Balance, CallContext, Entry, Outcome, Payload, PromiseBatch, Ticket};
use crate::registry::Registry;
use std::collections::{BTreeMap, HashSet};
use tracing::{info, warn};

pub struct Factory {
    account_id: AccountId,
    payload: Payload,
    registry: Registry,
    pending: BTreeMap<Ticket, PendingAction>,
    retired: HashSet<String>,
    /// Slots whose creation failed after the child was already deleted.
    never_created: HashSet<usize>,
    orphans: Vec<Orphan>,
    next_ticket: u64,
}

impl Factory {
    /// Creates an empty factory that deploys `payload` to every child.
    ///
    /// `account_id` is the factory's own address. Only callbacks signed by it
    /// are accepted by [`Factory::resolve`].
    pub fn new(account_id: AccountId, payload: Payload) -> Self {
        Self {
            account_id,
            payload,
            registry: Registry::new(),
            pending: BTreeMap::new(),
            retired: HashSet::new(),
            never_created: HashSet::new(),
            orphans: Vec::new(),
            next_ticket: 1,
        }
    }

    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    // --- Queries ---

    /// Live entries in slots `start..end`.
    pub fn get_dao_list(&self, start: usize, end: usize) -> Result<Vec<Entry>, FactoryError> {
        Ok(self.registry.list_range(start, end)?)
    }

    /// Number of slots ever assigned, tombstones included.
    pub fn get_dao_list_length(&self) -> usize {
        self.registry.len()
    }

    /// Slot of a live child, or `None`.
    pub fn get_dao_index(&self, identifier: &str) -> Option<usize> {
        self.registry.index_of(identifier)
    }

    pub fn status(&self, identifier: &str) -> ChildStatus {
        let in_flight = |kind: PendingKind| {
            self.pending
                .values()
                .any(|p| p.kind == kind && p.identifier.as_str() == identifier)
        };

        if in_flight(PendingKind::Delete) {
            ChildStatus::PendingDelete
        } else if self.registry.index_of(identifier).is_some() {
            if in_flight(PendingKind::Create) {
                ChildStatus::PendingCreate
            } else {
                ChildStatus::Live
            }
        } else if self.retired.contains(identifier) {
            ChildStatus::Removed
        } else {
            ChildStatus::Unregistered
        }
    }

    /// Issued batches still waiting for an outcome, oldest first.
    pub fn pending(&self) -> Vec<PendingAction> {
        self.pending.values().cloned().collect()
    }

    pub fn orphans(&self) -> &[Orphan] {
        &self.orphans
    }

    // --- Mutations ---

    /// Registers `identifier` and returns the batch that creates, deploys and funds it.
    pub fn create_dao(
        &mut self,
        ctx: &CallContext,
        identifier: &str,
        required_deposit: Balance,
    ) -> Result<PromiseBatch, FactoryError> {
        if ctx.attached_deposit < required_deposit {
            return Err(FactoryError::InsufficientDeposit {
                attached: ctx.attached_deposit,
                required: required_deposit,
            });
        }
        let account = AccountId::parse(identifier)
            .map_err(|_| FactoryError::InvalidAccount(identifier.to_string()))?;
        if self.retired.contains(identifier) {
            return Err(FactoryError::Retired(identifier.to_string()));
        }
        if self.registry.index_of(identifier).is_some() {
            return Err(FactoryError::AlreadyRegistered(identifier.to_string()));
        }

        let entry = Entry::new(&account, ctx.block_timestamp, ctx.predecessor.clone());
        let slot = self.registry.append(entry)?;
        let ticket = self.track(PendingKind::Create, account.clone(), slot);
        info!(identifier, slot, %ticket, creator = %ctx.predecessor, "Registered");

        Ok(PromiseBatch::create(ticket, account)
            .create_account()
            .deploy_contract(self.payload.clone())
            .transfer(ctx.attached_deposit))
    }

    /// Tombstones `identifier` and returns the batch that deletes its account,
    /// sending the residual balance to `beneficiary`.
    pub fn delete_dao(
        &mut self,
        ctx: &CallContext,
        identifier: &str,
        beneficiary: &str,
    ) -> Result<PromiseBatch, FactoryError> {
        let account = AccountId::parse(identifier)
            .map_err(|_| FactoryError::InvalidAccount(identifier.to_string()))?;
        let beneficiary = AccountId::parse(beneficiary)
            .map_err(|_| FactoryError::InvalidBeneficiary(beneficiary.to_string()))?;
        if self.registry.index_of(identifier).is_none() {
            return Err(FactoryError::NotFound(identifier.to_string()));
        }

        let tombstone = Entry::tombstone(&account, ctx.block_timestamp, ctx.predecessor.clone());
        let slot = self.registry.remove_live(identifier, tombstone)?;
        self.retired.insert(identifier.to_string());
        let ticket = self.track(PendingKind::Delete, account.clone(), slot);
        info!(identifier, slot, %ticket, %beneficiary, "Removed");

        Ok(PromiseBatch::create(ticket, account).delete_account(beneficiary))
    }

    /// Settles an issued batch with the outcome the environment reported for it.
    ///
    /// The call must come from the factory itself.
    pub fn resolve(
        &mut self,
        ctx: &CallContext,
        ticket: Ticket,
        outcome: Outcome,
    ) -> Result<Resolution, FactoryError> {
        if ctx.predecessor != self.account_id {
            return Err(FactoryError::Unauthorized(ctx.predecessor.to_string()));
        }
        let action = self
            .pending
            .remove(&ticket)
            .ok_or(FactoryError::UnknownTicket(ticket))?;
        let identifier = action.identifier.as_str();

        let reason = match outcome {
            Outcome::Succeeded => {
                self.never_created.remove(&action.slot);
                info!(identifier, %ticket, kind = ?action.kind, "Confirmed");
                return Ok(Resolution::Confirmed);
            }
            Outcome::Failed(reason) => reason,
        };

        match action.kind {
            PendingKind::Create => {
                if self.registry.index_of(identifier) != Some(action.slot) {
                    info!(identifier, %ticket, %reason, "Creation failed after deletion");
                    // A deletion that already failed had nothing to delete.
                    self.orphans.retain(|orphan| orphan.slot != action.slot);
                    self.never_created.insert(action.slot);
                    return Ok(Resolution::Superseded);
                }
                let tombstone =
                    Entry::tombstone(&action.identifier, ctx.block_timestamp, ctx.predecessor.clone());
                let slot = self.registry.remove_live(identifier, tombstone)?;
                warn!(identifier, slot, %ticket, %reason, "Creation failed, rolled back");
                Ok(Resolution::RolledBack { slot })
            }
            PendingKind::Delete => {
                if self.never_created.remove(&action.slot) {
                    info!(identifier, %ticket, %reason, "Deletion failed, account never existed");
                    return Ok(Resolution::Superseded);
                }
                warn!(identifier, slot = action.slot, %ticket, %reason, "Deletion failed, account orphaned");
                self.orphans.push(Orphan {
                    identifier: action.identifier,
                    slot: action.slot,
                    reason,
                });
                Ok(Resolution::Orphaned)
            }
        }
    }

    fn track(&mut self, kind: PendingKind, identifier: AccountId, slot: usize) -> Ticket {
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        self.pending.insert(
            ticket,
            PendingAction {
                ticket,
                kind,
                identifier,
                slot,
            },
        );
        ticket
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BatchAction;

    fn account(id: &str) -> AccountId {
        AccountId::parse(id).unwrap()
    }

    fn factory() -> Factory {
        Factory::new(account("factory.test"), Payload::from_bytes(b"\0asm".to_vec()))
    }

    fn call(deposit: Balance, at: u64) -> CallContext {
        CallContext::new(account("caller.test"), deposit, at)
    }

    fn callback(at: u64) -> CallContext {
        CallContext::callback(account("factory.test"), at)
    }

    #[test]
    fn create_registers_immediately_and_builds_batch() {
        let mut factory = factory();

        let batch = factory.create_dao(&call(10, 42), "alice.test", 5).unwrap();

        assert_eq!(factory.get_dao_list_length(), 1);
        assert_eq!(factory.get_dao_index("alice.test"), Some(0));
        assert_eq!(batch.receiver, account("alice.test"));
        assert_eq!(
            batch.actions,
            vec![
                BatchAction::CreateAccount,
                BatchAction::DeployContract(Payload::from_bytes(b"\0asm".to_vec())),
                BatchAction::Transfer(10),
            ]
        );

        let entry = factory.registry().get(0).unwrap();
        assert_eq!(entry.created_at, 42);
        assert_eq!(entry.creator, account("caller.test"));
    }

    #[test]
    fn create_rejects_insufficient_deposit() {
        let mut factory = factory();

        let err = factory.create_dao(&call(3, 1), "bob.test", 5).unwrap_err();

        assert_eq!(
            err,
            FactoryError::InsufficientDeposit {
                attached: 3,
                required: 5
            }
        );
        assert_eq!(factory.get_dao_list_length(), 0);
        assert!(factory.pending().is_empty());
    }

    #[test]
    fn create_rejects_invalid_identifier() {
        let mut factory = factory();
        let err = factory.create_dao(&call(10, 1), "Not Valid", 5).unwrap_err();
        assert_eq!(err, FactoryError::InvalidAccount("Not Valid".into()));
        assert_eq!(factory.get_dao_list_length(), 0);
    }

    #[test]
    fn create_rejects_live_duplicate() {
        let mut factory = factory();
        factory.create_dao(&call(10, 1), "alice.test", 5).unwrap();

        let err = factory.create_dao(&call(10, 2), "alice.test", 5).unwrap_err();

        assert_eq!(err, FactoryError::AlreadyRegistered("alice.test".into()));
        assert_eq!(factory.get_dao_list_length(), 1);
    }

    #[test]
    fn delete_tombstones_slot_and_builds_batch() {
        let mut factory = factory();
        factory.create_dao(&call(10, 1), "alice.test", 5).unwrap();

        let batch = factory
            .delete_dao(&call(0, 2), "alice.test", "charlie.test")
            .unwrap();

        assert_eq!(factory.get_dao_index("alice.test"), None);
        assert_eq!(factory.get_dao_list_length(), 1);
        assert!(factory.get_dao_list(0, 1).unwrap().is_empty());
        assert_eq!(batch.receiver, account("alice.test"));
        assert_eq!(
            batch.actions,
            vec![BatchAction::DeleteAccount {
                beneficiary: account("charlie.test")
            }]
        );

        let slot = factory.registry().get(0).unwrap();
        assert_eq!(slot.identifier, "alice.test:X");
        assert_eq!(slot.created_at, 2);
    }

    #[test]
    fn delete_rejects_unknown_and_invalid_input() {
        let mut factory = factory();
        factory.create_dao(&call(10, 1), "alice.test", 5).unwrap();

        assert_eq!(
            factory.delete_dao(&call(0, 2), "nonexistent.test", "charlie.test"),
            Err(FactoryError::NotFound("nonexistent.test".into()))
        );
        assert_eq!(
            factory.delete_dao(&call(0, 2), "alice..test", "charlie.test"),
            Err(FactoryError::InvalidAccount("alice..test".into()))
        );
        assert_eq!(
            factory.delete_dao(&call(0, 2), "alice.test", "-charlie"),
            Err(FactoryError::InvalidBeneficiary("-charlie".into()))
        );

        assert_eq!(factory.get_dao_index("alice.test"), Some(0));
        assert_eq!(factory.pending().len(), 1);
    }

    #[test]
    fn deleted_name_cannot_be_created_again() {
        let mut factory = factory();
        factory.create_dao(&call(10, 1), "alice.test", 5).unwrap();
        factory.delete_dao(&call(0, 2), "alice.test", "charlie.test").unwrap();

        let err = factory.create_dao(&call(10, 3), "alice.test", 5).unwrap_err();

        assert_eq!(err, FactoryError::Retired("alice.test".into()));
        assert_eq!(factory.get_dao_index("alice.test"), None);
        assert_eq!(factory.get_dao_list_length(), 1);
    }

    #[test]
    fn slot_zero_is_a_real_index() {
        let mut factory = factory();
        factory.create_dao(&call(10, 1), "first.test", 5).unwrap();

        assert_eq!(factory.get_dao_index("first.test"), Some(0));
        assert_eq!(factory.get_dao_index("second.test"), None);
    }

    #[test]
    fn indices_stay_stable_across_unrelated_changes() {
        let mut factory = factory();
        factory.create_dao(&call(10, 1), "a1.test", 5).unwrap();
        factory.create_dao(&call(10, 2), "a2.test", 5).unwrap();
        let before = factory.get_dao_index("a2.test");

        factory.delete_dao(&call(0, 3), "a1.test", "b.test").unwrap();
        factory.create_dao(&call(10, 4), "a3.test", 5).unwrap();

        assert_eq!(factory.get_dao_index("a2.test"), before);
        assert_eq!(factory.get_dao_index("a3.test"), Some(2));
        assert_eq!(factory.get_dao_index("a2.test"), factory.get_dao_index("a2.test"));
    }

    #[test]
    fn length_counts_successful_creates_only() {
        let mut factory = factory();
        let mut successes = 0;
        for (i, (id, deposit)) in [("a1.test", 10), ("a2.test", 1), ("bad id", 10), ("a3.test", 10)]
            .into_iter()
            .enumerate()
        {
            let before = factory.get_dao_list_length();
            if factory.create_dao(&call(deposit, i as u64), id, 5).is_ok() {
                successes += 1;
            }
            assert!(factory.get_dao_list_length() >= before);
        }
        assert_eq!(factory.get_dao_list_length(), successes);
        assert_eq!(successes, 2);
    }

    #[test]
    fn status_follows_lifecycle() {
        let mut factory = factory();
        assert_eq!(factory.status("alice.test"), ChildStatus::Unregistered);

        let created = factory.create_dao(&call(10, 1), "alice.test", 5).unwrap();
        assert_eq!(factory.status("alice.test"), ChildStatus::PendingCreate);

        factory.resolve(&callback(2), created.ticket, Outcome::Succeeded).unwrap();
        assert_eq!(factory.status("alice.test"), ChildStatus::Live);

        let deleted = factory.delete_dao(&call(0, 3), "alice.test", "bob.test").unwrap();
        assert_eq!(factory.status("alice.test"), ChildStatus::PendingDelete);

        factory.resolve(&callback(4), deleted.ticket, Outcome::Succeeded).unwrap();
        assert_eq!(factory.status("alice.test"), ChildStatus::Removed);
        assert!(factory.pending().is_empty());
    }

    #[test]
    fn failed_creation_rolls_back_and_releases_name() {
        let mut factory = factory();
        let batch = factory.create_dao(&call(10, 1), "alice.test", 5).unwrap();

        let resolution = factory
            .resolve(&callback(2), batch.ticket, Outcome::Failed("account exists".into()))
            .unwrap();

        assert_eq!(resolution, Resolution::RolledBack { slot: 0 });
        assert_eq!(factory.get_dao_index("alice.test"), None);
        assert_eq!(factory.status("alice.test"), ChildStatus::Unregistered);
        assert_eq!(factory.registry().get(0).unwrap().identifier, "alice.test:X");
        assert_eq!(factory.registry().get(0).unwrap().creator, account("factory.test"));

        let retry = factory.create_dao(&call(10, 3), "alice.test", 5).unwrap();
        assert_eq!(factory.get_dao_index("alice.test"), Some(1));
        assert_ne!(retry.ticket, batch.ticket);
    }

    #[test]
    fn failed_creation_after_deletion_is_superseded() {
        let mut factory = factory();
        let created = factory.create_dao(&call(10, 1), "alice.test", 5).unwrap();
        factory.delete_dao(&call(0, 2), "alice.test", "bob.test").unwrap();

        let resolution = factory
            .resolve(&callback(3), created.ticket, Outcome::Failed("boom".into()))
            .unwrap();

        assert_eq!(resolution, Resolution::Superseded);
        assert_eq!(factory.status("alice.test"), ChildStatus::PendingDelete);
    }

    #[test]
    fn failed_deletion_records_orphan() {
        let mut factory = factory();
        let created = factory.create_dao(&call(10, 1), "alice.test", 5).unwrap();
        factory.resolve(&callback(2), created.ticket, Outcome::Succeeded).unwrap();
        let deleted = factory.delete_dao(&call(0, 3), "alice.test", "bob.test").unwrap();

        let resolution = factory
            .resolve(&callback(4), deleted.ticket, Outcome::Failed("no such account".into()))
            .unwrap();

        assert_eq!(resolution, Resolution::Orphaned);
        assert_eq!(
            factory.orphans(),
            &[Orphan {
                identifier: account("alice.test"),
                slot: 0,
                reason: "no such account".into(),
            }]
        );
        assert_eq!(factory.status("alice.test"), ChildStatus::Removed);
    }

    #[test]
    fn resolve_rejects_unknown_or_repeated_ticket() {
        let mut factory = factory();
        let batch = factory.create_dao(&call(10, 1), "alice.test", 5).unwrap();
        factory.resolve(&callback(2), batch.ticket, Outcome::Succeeded).unwrap();

        assert_eq!(
            factory.resolve(&callback(3), batch.ticket, Outcome::Succeeded),
            Err(FactoryError::UnknownTicket(batch.ticket))
        );
        assert_eq!(
            factory.resolve(&callback(3), Ticket(99), Outcome::Succeeded),
            Err(FactoryError::UnknownTicket(Ticket(99)))
        );
    }

    #[test]
    fn resolve_rejects_outcomes_not_from_factory() {
        let mut factory = factory();
        let created = factory.create_dao(&call(10, 1), "alice.test", 5).unwrap();

        let forged = CallContext::new(account("mallory.test"), 0, 2);
        let err = factory
            .resolve(&forged, created.ticket, Outcome::Failed("forged".into()))
            .unwrap_err();

        assert_eq!(err, FactoryError::Unauthorized("mallory.test".into()));
        assert_eq!(factory.get_dao_index("alice.test"), Some(0));
        assert_eq!(factory.status("alice.test"), ChildStatus::PendingCreate);

        // The ticket is still open for the real callback
        let resolution = factory
            .resolve(&callback(3), created.ticket, Outcome::Succeeded)
            .unwrap();
        assert_eq!(resolution, Resolution::Confirmed);
        assert_eq!(factory.status("alice.test"), ChildStatus::Live);
    }

    #[test]
    fn forged_deletion_failure_leaves_no_orphan() {
        let mut factory = factory();
        let created = factory.create_dao(&call(10, 1), "alice.test", 5).unwrap();
        factory.resolve(&callback(2), created.ticket, Outcome::Succeeded).unwrap();
        let deleted = factory.delete_dao(&call(0, 3), "alice.test", "bob.test").unwrap();

        let forged = CallContext::new(account("caller.test"), 0, 4);
        assert!(factory
            .resolve(&forged, deleted.ticket, Outcome::Failed("forged".into()))
            .is_err());

        assert!(factory.orphans().is_empty());
        assert_eq!(factory.status("alice.test"), ChildStatus::PendingDelete);
    }

    #[test]
    fn deletion_of_never_created_child_is_not_an_orphan() {
        let mut factory = factory();
        let created = factory.create_dao(&call(10, 1), "alice.test", 5).unwrap();
        let deleted = factory.delete_dao(&call(0, 2), "alice.test", "bob.test").unwrap();

        let create = factory
            .resolve(&callback(3), created.ticket, Outcome::Failed("account exists".into()))
            .unwrap();
        let delete = factory
            .resolve(
                &callback(4),
                deleted.ticket,
                Outcome::Failed("cannot delete missing account alice.test".into()),
            )
            .unwrap();

        assert_eq!(create, Resolution::Superseded);
        assert_eq!(delete, Resolution::Superseded);
        assert!(factory.orphans().is_empty());
        assert!(factory.pending().is_empty());
        assert_eq!(factory.status("alice.test"), ChildStatus::Removed);
    }

    #[test]
    fn deletion_failure_reported_first_is_cleared_by_failed_creation() {
        let mut factory = factory();
        let created = factory.create_dao(&call(10, 1), "alice.test", 5).unwrap();
        let deleted = factory.delete_dao(&call(0, 2), "alice.test", "bob.test").unwrap();

        let delete = factory
            .resolve(&callback(3), deleted.ticket, Outcome::Failed("missing".into()))
            .unwrap();
        assert_eq!(delete, Resolution::Orphaned);

        let create = factory
            .resolve(&callback(4), created.ticket, Outcome::Failed("account exists".into()))
            .unwrap();
        assert_eq!(create, Resolution::Superseded);
        assert!(factory.orphans().is_empty());
    }
}
