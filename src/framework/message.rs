//! # Factory Messages
//!
//! Requests sent from a [`FactoryClient`](crate::framework::FactoryClient) to the
//! [`FactoryActor`](crate::framework::FactoryActor). Each carries a one-shot
//! channel for its reply.

use crate::factory::{ChildStatus, Orphan, PendingAction, Resolution};
use crate::framework::error::FrameworkError;
use crate::model::{Balance, CallContext, Entry, Outcome, PromiseBatch, Ticket};
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the actor.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

#[derive(Debug)]
pub enum FactoryRequest {
    Create {
        ctx: CallContext,
        identifier: String,
        deposit: Balance,
        respond_to: Response<PromiseBatch>,
    },
    Delete {
        ctx: CallContext,
        identifier: String,
        beneficiary: String,
        respond_to: Response<PromiseBatch>,
    },
    Resolve {
        ctx: CallContext,
        ticket: Ticket,
        outcome: Outcome,
        respond_to: Response<Resolution>,
    },
    List {
        start: usize,
        end: usize,
        respond_to: Response<Vec<Entry>>,
    },
    Length {
        respond_to: Response<usize>,
    },
    Index {
        identifier: String,
        respond_to: Response<Option<usize>>,
    },
    Status {
        identifier: String,
        respond_to: Response<ChildStatus>,
    },
    Pending {
        respond_to: Response<Vec<PendingAction>>,
    },
    Orphans {
        respond_to: Response<Vec<Orphan>>,
    },
}
