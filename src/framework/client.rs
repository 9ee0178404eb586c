//! # Factory Client
//!
//! Cloneable async handle to a running [`FactoryActor`](crate::framework::FactoryActor).
//! Holding only a channel sender, it is cheap to clone and can be shared across tasks.

use crate::factory::{ChildStatus, Orphan, PendingAction, Resolution};
use crate::framework::error::FrameworkError;
use crate::framework::message::{FactoryRequest, Response};
use crate::model::{Balance, CallContext, Entry, Outcome, PromiseBatch, Ticket};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct FactoryClient {
    sender: mpsc::Sender<FactoryRequest>,
}

impl FactoryClient {
    pub fn new(sender: mpsc::Sender<FactoryRequest>) -> Self {
        Self { sender }
    }

    /// A handle that does not keep the actor alive.
    pub fn downgrade(&self) -> WeakFactoryClient {
        WeakFactoryClient {
            sender: self.sender.downgrade(),
        }
    }

    async fn call<T>(
        &self,
        build: impl FnOnce(Response<T>) -> FactoryRequest,
    ) -> Result<T, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    /// Registers a child and returns the batch that creates it.
    #[instrument(skip(self, ctx), fields(caller = %ctx.predecessor))]
    pub async fn create_dao(
        &self,
        ctx: CallContext,
        identifier: &str,
        deposit: Balance,
    ) -> Result<PromiseBatch, FrameworkError> {
        debug!("Sending request");
        let identifier = identifier.to_string();
        self.call(|respond_to| FactoryRequest::Create {
            ctx,
            identifier,
            deposit,
            respond_to,
        })
        .await
    }

    /// Tombstones a child and returns the batch that deletes its account.
    #[instrument(skip(self, ctx), fields(caller = %ctx.predecessor))]
    pub async fn delete_dao(
        &self,
        ctx: CallContext,
        identifier: &str,
        beneficiary: &str,
    ) -> Result<PromiseBatch, FrameworkError> {
        debug!("Sending request");
        let identifier = identifier.to_string();
        let beneficiary = beneficiary.to_string();
        self.call(|respond_to| FactoryRequest::Delete {
            ctx,
            identifier,
            beneficiary,
            respond_to,
        })
        .await
    }

    /// Reports the outcome of an issued batch.
    #[instrument(skip(self, ctx))]
    pub async fn resolve(
        &self,
        ctx: CallContext,
        ticket: Ticket,
        outcome: Outcome,
    ) -> Result<Resolution, FrameworkError> {
        debug!("Sending request");
        self.call(|respond_to| FactoryRequest::Resolve {
            ctx,
            ticket,
            outcome,
            respond_to,
        })
        .await
    }

    pub async fn get_dao_list(&self, start: usize, end: usize) -> Result<Vec<Entry>, FrameworkError> {
        self.call(|respond_to| FactoryRequest::List {
            start,
            end,
            respond_to,
        })
        .await
    }

    pub async fn get_dao_list_length(&self) -> Result<usize, FrameworkError> {
        self.call(|respond_to| FactoryRequest::Length { respond_to })
            .await
    }

    pub async fn get_dao_index(&self, identifier: &str) -> Result<Option<usize>, FrameworkError> {
        let identifier = identifier.to_string();
        self.call(|respond_to| FactoryRequest::Index {
            identifier,
            respond_to,
        })
        .await
    }

    pub async fn status(&self, identifier: &str) -> Result<ChildStatus, FrameworkError> {
        let identifier = identifier.to_string();
        self.call(|respond_to| FactoryRequest::Status {
            identifier,
            respond_to,
        })
        .await
    }

    pub async fn pending(&self) -> Result<Vec<PendingAction>, FrameworkError> {
        self.call(|respond_to| FactoryRequest::Pending { respond_to })
            .await
    }

    pub async fn orphans(&self) -> Result<Vec<Orphan>, FrameworkError> {
        self.call(|respond_to| FactoryRequest::Orphans { respond_to })
            .await
    }
}

/// Non-owning counterpart of [`FactoryClient`].
#[derive(Clone)]
pub struct WeakFactoryClient {
    sender: mpsc::WeakSender<FactoryRequest>,
}

impl WeakFactoryClient {
    /// Returns a usable client while the actor is still accepting requests.
    pub fn upgrade(&self) -> Option<FactoryClient> {
        self.sender.upgrade().map(FactoryClient::new)
    }
}
