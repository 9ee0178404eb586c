//! # DAO Factory
//!
//! > **Create child accounts, deploy a fixed payload to each, and keep an ordered registry of them.**
//!
//! The factory pairs every registry mutation with a deferred action for an
//! external execution environment: creating a child registers it and asks the
//! environment to create, deploy and fund the account; deleting it tombstones
//! its slot and asks the environment to delete the account and pay its balance
//! to a beneficiary.
//!
//! ## Design
//!
//! ### 1. Stable slots
//! The [`registry`] never shrinks. A deleted child's slot is overwritten by a
//! tombstone, so every index handed out stays valid and a name can never be
//! confused with a later registration.
//!
//! ### 2. Optimistic mutation, explicit reconciliation
//! Registry state changes *before* the environment runs the batch. Each batch
//! carries a [`Ticket`](model::Ticket); when its outcome is reported through
//! [`Factory::resolve`](factory::Factory::resolve), failed creations are rolled
//! back and failed deletions are recorded as orphans.
//!
//! ### 3. One request at a time
//! The [`FactoryActor`](framework::FactoryActor) owns all state and processes
//! requests sequentially in one Tokio task, so nothing needs a lock.
//! Batches are executed by a separate dispatcher, out of band.
//!
//! ### 4. Observability
//! `tracing` everywhere with structured fields. See [`lifecycle::tracing`].
//!
//! ## Module Tour
//!
//! - [`model`] - account ids, entries, call context, deferred batches
//! - [`registry`] - the append-only slot list and its live-name index
//! - [`factory`] - create/delete/resolve and the child lifecycle
//! - [`framework`] - actor, client and messages
//! - [`executor`] - the execution environment: trait, sandbox, mock
//! - [`lifecycle`] - wiring it all together, tracing setup
//! - [`config`] - environment-driven configuration
//!
//! ## Quick Start
//!
//! ```rust
//! use dao_factory::config::FactoryConfig;
//! use dao_factory::executor::Sandbox;
//! use dao_factory::lifecycle::FactorySystem;
//! use dao_factory::model::{CallContext, Payload};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = FactoryConfig::default();
//!     let payload = Payload::from_bytes(b"\0asm\x01\0\0\0".to_vec());
//!     let system = FactorySystem::new(&config, payload, Arc::new(Sandbox::new(1)));
//!
//!     let ctx = CallContext::new("caller.test".parse().unwrap(), 10, 1);
//!     system.client.create_dao(ctx, "alice.test", 5).await.unwrap();
//!     system.settled().await.unwrap();
//!
//!     assert_eq!(system.client.get_dao_index("alice.test").await.unwrap(), Some(0));
//!     system.shutdown().await.unwrap();
//! }
//! ```

pub mod config;
pub mod executor;
pub mod factory;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod registry;
