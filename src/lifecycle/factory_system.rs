use crate::config::FactoryConfig;
use crate::executor::Executor;
use crate::factory::Factory;
use crate::framework::{FactoryActor, FactoryClient, FrameworkError, Outbox, WeakFactoryClient};
use crate::model::{AccountId, CallContext, Payload, PromiseBatch};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

const SETTLE_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// The runtime orchestrator for a factory and its execution environment.
///
/// `FactorySystem` is responsible for:
/// - **Lifecycle Management**: Starting and stopping the factory actor and the dispatcher
/// - **Dependency Wiring**: Connecting the factory's outbox to the [`Executor`]
/// - **Reconciliation**: Feeding every receipt back into the factory via `resolve`
///
/// # Architecture
///
/// ```text
/// caller --create/delete--> FactoryActor --batch--> dispatcher --execute--> Executor
///                                ^                       |
///                                +-------resolve---------+
/// ```
///
/// The dispatcher only holds a weak handle to the actor, so the cycle above does
/// not keep the actor alive once the owner drops [`FactorySystem::client`].
///
/// # Example
///
/// ```ignore
/// let system = FactorySystem::new(&config, payload, Arc::new(Sandbox::new(1)));
/// let ctx = CallContext::new(caller, 10, 1);
/// system.client.create_dao(ctx, "alice.test", 5).await?;
/// system.settled().await?;
/// system.shutdown().await?;
/// ```
pub struct FactorySystem {
    /// Client for interacting with the factory actor
    pub client: FactoryClient,

    /// Task handles for the actor and the dispatcher (used for graceful shutdown)
    handles: Vec<JoinHandle<()>>,
}

impl FactorySystem {
    /// Creates a factory deploying `payload` and starts it together with a
    /// dispatcher that runs every issued batch on `executor`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(config: &FactoryConfig, payload: Payload, executor: Arc<dyn Executor>) -> Self {
        let factory = Factory::new(config.account_id.clone(), payload);
        let (actor, client) = FactoryActor::new(config.buffer_size, factory);
        let (outbox, batches) = mpsc::unbounded_channel();

        let actor_handle = tokio::spawn(actor.run(Outbox::new(outbox)));
        let dispatch_handle = tokio::spawn(dispatch(
            batches,
            executor,
            client.downgrade(),
            config.account_id.clone(),
        ));

        Self {
            client,
            handles: vec![actor_handle, dispatch_handle],
        }
    }

    /// Waits until every issued batch has been resolved.
    ///
    /// Fails with [`FrameworkError::DispatcherStopped`] if batches are still
    /// pending but the dispatcher is no longer running.
    pub async fn settled(&self) -> Result<(), FrameworkError> {
        while !self.client.pending().await?.is_empty() {
            if self.handles.iter().any(JoinHandle::is_finished) {
                error!("Dispatcher stopped with batches pending");
                return Err(FrameworkError::DispatcherStopped);
            }
            tokio::time::sleep(SETTLE_POLL_INTERVAL).await;
        }
        Ok(())
    }

    /// Gracefully shuts down the system.
    ///
    /// Dropping the client closes the actor's channel once no other clone is
    /// left. The actor then drops its outbox, which lets the dispatcher drain
    /// and stop. Outcomes of batches still in flight at that point are logged
    /// and dropped.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down factory system...");
        drop(self.client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Factory task failed: {:?}", e);
                return Err(format!("Factory task failed: {:?}", e));
            }
        }

        info!("Factory system shutdown complete.");
        Ok(())
    }
}

async fn dispatch(
    mut batches: mpsc::UnboundedReceiver<PromiseBatch>,
    executor: Arc<dyn Executor>,
    factory: WeakFactoryClient,
    factory_id: AccountId,
) {
    info!("Dispatcher started");

    while let Some(batch) = batches.recv().await {
        let ticket = batch.ticket;
        let receipt = executor.execute(&batch).await;
        debug!(%ticket, receiver = %batch.receiver, ?receipt, "Executed");

        let Some(client) = factory.upgrade() else {
            warn!(%ticket, outcome = ?receipt.outcome, "Factory closed, outcome dropped");
            continue;
        };
        let ctx = CallContext::callback(factory_id.clone(), receipt.block_timestamp);
        match client.resolve(ctx, ticket, receipt.outcome).await {
            Ok(resolution) => debug!(%ticket, ?resolution, "Resolved"),
            Err(e) => warn!(%ticket, error = %e, "Resolve failed"),
        }
    }

    info!("Dispatcher stopped");
}
