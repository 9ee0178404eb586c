//! Runtime orchestration and lifecycle management.
//!
//! - [`FactorySystem`] - starts the factory actor and the dispatcher, wires the
//!   outbox to an [`Executor`](crate::executor::Executor), and shuts both down
//! - [`setup_tracing`] - initializes logging
//!
//! The dispatcher closes the reconciliation loop: every batch the factory issues
//! is executed, and the resulting receipt is reported back through
//! [`FactoryClient::resolve`](crate::framework::FactoryClient::resolve).

pub mod factory_system;
pub mod tracing;

pub use self::factory_system::*;
pub use self::tracing::*;
