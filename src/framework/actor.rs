//! # Factory Actor
//!
//! The "server" half of the factory. It owns the [`Factory`] (and with it the
//! registry) and processes [`FactoryRequest`]s one at a time.
//!
//! **Concurrency Model**:
//! Any number of cloned clients may send requests concurrently, but the actor
//! handles them *sequentially* in a single task. Every request runs to
//! completion before the next one is looked at, so the registry needs no
//! `Mutex` or `RwLock`.
//!
//! Batches issued by `Create`/`Delete` are returned to the caller *and*
//! forwarded to the [`Outbox`], where a dispatcher can pick them up and run them
//! against the execution environment. The actor never waits for them.

use crate::factory::Factory;
use crate::framework::client::FactoryClient;
use crate::framework::error::FrameworkError;
use crate::framework::message::FactoryRequest;
use crate::model::PromiseBatch;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Where issued batches go once the registry has been updated.
#[derive(Debug, Clone, Default)]
pub struct Outbox {
    sender: Option<mpsc::UnboundedSender<PromiseBatch>>,
}

impl Outbox {
    pub fn new(sender: mpsc::UnboundedSender<PromiseBatch>) -> Self {
        Self {
            sender: Some(sender),
        }
    }

    /// An outbox that drops every batch; callers act on the returned batch themselves.
    pub fn detached() -> Self {
        Self::default()
    }

    fn forward(&self, batch: &PromiseBatch) {
        let Some(sender) = &self.sender else { return };
        if sender.send(batch.clone()).is_err() {
            warn!(ticket = %batch.ticket, receiver = %batch.receiver, "Dispatcher gone, batch not forwarded");
        }
    }
}

pub struct FactoryActor {
    receiver: mpsc::Receiver<FactoryRequest>,
    factory: Factory,
}

impl FactoryActor {
    /// Creates a new `FactoryActor` around `factory` and its associated `FactoryClient`.
    ///
    /// `buffer_size` is the capacity of the request channel. When it is full,
    /// client calls wait until there is space.
    pub fn new(buffer_size: usize, factory: Factory) -> (Self, FactoryClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self { receiver, factory };
        (actor, FactoryClient::new(sender))
    }

    /// Runs the actor's event loop until every client has been dropped.
    pub async fn run(mut self, outbox: Outbox) {
        let factory_id = self.factory.account_id().to_string();
        info!(%factory_id, "Factory started");

        while let Some(msg) = self.receiver.recv().await {
            self.handle(msg, &outbox);
        }

        info!(
            %factory_id,
            len = self.factory.get_dao_list_length(),
            pending = self.factory.pending().len(),
            "Shutdown"
        );
    }

    fn handle(&mut self, msg: FactoryRequest, outbox: &Outbox) {
        match msg {
            FactoryRequest::Create {
                ctx,
                identifier,
                deposit,
                respond_to,
            } => {
                debug!(%identifier, deposit, caller = %ctx.predecessor, "Create");
                let result = self.factory.create_dao(&ctx, &identifier, deposit);
                match &result {
                    Ok(batch) => {
                        info!(%identifier, len = self.factory.get_dao_list_length(), "Created");
                        outbox.forward(batch);
                    }
                    Err(e) => warn!(%identifier, error = %e, "Create rejected"),
                }
                let _ = respond_to.send(result.map_err(FrameworkError::from));
            }
            FactoryRequest::Delete {
                ctx,
                identifier,
                beneficiary,
                respond_to,
            } => {
                debug!(%identifier, %beneficiary, caller = %ctx.predecessor, "Delete");
                let result = self.factory.delete_dao(&ctx, &identifier, &beneficiary);
                match &result {
                    Ok(batch) => {
                        info!(%identifier, "Deleted");
                        outbox.forward(batch);
                    }
                    Err(e) => warn!(%identifier, error = %e, "Delete rejected"),
                }
                let _ = respond_to.send(result.map_err(FrameworkError::from));
            }
            FactoryRequest::Resolve {
                ctx,
                ticket,
                outcome,
                respond_to,
            } => {
                debug!(%ticket, ?outcome, "Resolve");
                let result = self.factory.resolve(&ctx, ticket, outcome);
                if let Err(e) = &result {
                    warn!(%ticket, error = %e, "Resolve rejected");
                }
                let _ = respond_to.send(result.map_err(FrameworkError::from));
            }
            FactoryRequest::List {
                start,
                end,
                respond_to,
            } => {
                let result = self.factory.get_dao_list(start, end);
                debug!(start, end, ok = result.is_ok(), "List");
                let _ = respond_to.send(result.map_err(FrameworkError::from));
            }
            FactoryRequest::Length { respond_to } => {
                let _ = respond_to.send(Ok(self.factory.get_dao_list_length()));
            }
            FactoryRequest::Index {
                identifier,
                respond_to,
            } => {
                let slot = self.factory.get_dao_index(&identifier);
                debug!(%identifier, ?slot, "Index");
                let _ = respond_to.send(Ok(slot));
            }
            FactoryRequest::Status {
                identifier,
                respond_to,
            } => {
                let status = self.factory.status(&identifier);
                debug!(%identifier, ?status, "Status");
                let _ = respond_to.send(Ok(status));
            }
            FactoryRequest::Pending { respond_to } => {
                let _ = respond_to.send(Ok(self.factory.pending()));
            }
            FactoryRequest::Orphans { respond_to } => {
                let _ = respond_to.send(Ok(self.factory.orphans().to_vec()));
            }
        }
    }
}
