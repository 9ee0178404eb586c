//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter whose
//! level filter comes from `RUST_LOG`.
//!
//! ```bash
//! # State changes only: registrations, removals, rollbacks, orphans
//! RUST_LOG=info cargo run
//!
//! # Every request, batch and receipt
//! RUST_LOG=debug cargo run
//!
//! # Registry internals only
//! RUST_LOG=dao_factory::registry=debug cargo run
//! ```
//!
//! A typical `info` run of the demo looks like:
//!
//! ```text
//! INFO Factory started factory_id="factory.test"
//! INFO create_dao: Registered identifier="alice.test" slot=0 ticket=ticket_1 creator=caller.test
//! INFO Batch applied ticket=ticket_1 receiver=alice.test
//! INFO Confirmed identifier="alice.test" ticket=ticket_1 kind=Create
//! ```
//!
//! Rejected calls are logged at `warn` by the actor with the error attached,
//! so failed preconditions are visible without raising the level.

pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
