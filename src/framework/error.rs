//! # Framework Errors
//!
//! Errors a [`FactoryClient`](crate::framework::FactoryClient) call can end in:
//! either the actor could not be reached, or it rejected the request.
//! [`FactorySystem::settled`](crate::lifecycle::FactorySystem::settled) also
//! reports a dispatcher that stopped early.

use crate::factory::FactoryError;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Dispatcher stopped before all batches were resolved")]
    DispatcherStopped,
    #[error(transparent)]
    Factory(#[from] FactoryError),
}
