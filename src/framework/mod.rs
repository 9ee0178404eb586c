//! Actor plumbing around the [`Factory`](crate::factory::Factory).
//!
//! # Main Components
//!
//! - [`FactoryActor`] - Owns the factory and serializes every request against it
//! - [`FactoryClient`] - Type-safe async handle for sending requests
//! - [`FactoryRequest`] - The messages exchanged between the two
//! - [`FrameworkError`] - Channel failures plus rejected factory calls
//!
//! The separation follows the usual client/server split: the actor is the only
//! owner of mutable state, clients only ever hold a channel sender.

pub mod actor;
pub mod client;
pub mod error;
pub mod message;

pub use actor::{FactoryActor, Outbox};
pub use client::{FactoryClient, WeakFactoryClient};
pub use error::FrameworkError;
pub use message::{FactoryRequest, Response};
