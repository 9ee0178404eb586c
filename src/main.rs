//! Demo: creates two children against an in-memory sandbox, deletes one, and
//! shows what the registry reports afterwards.
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```

use dao_factory::config::FactoryConfig;
use dao_factory::executor::Sandbox;
use dao_factory::lifecycle::{setup_tracing, FactorySystem};
use dao_factory::model::{AccountId, CallContext, Payload};
use std::sync::Arc;
use tracing::{error, info, Instrument};

/// Smallest valid wasm module, used when no payload file is configured.
const PLACEHOLDER_PAYLOAD: &[u8] = b"\0asm\x01\0\0\0";

const REQUIRED_DEPOSIT: u128 = 5;

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = FactoryConfig::from_env().map_err(|e| e.to_string())?;
    let payload = match config.payload_path {
        Some(_) => config.load_payload().map_err(|e| e.to_string())?,
        None => Payload::from_bytes(PLACEHOLDER_PAYLOAD),
    };
    info!(factory = %config.account_id, payload = ?payload, "Starting factory");

    let sandbox = Arc::new(Sandbox::new(REQUIRED_DEPOSIT));
    let caller: AccountId = "caller.test".parse().map_err(|e| format!("{e}"))?;
    let beneficiary: AccountId = "charlie.test".parse().map_err(|e| format!("{e}"))?;
    sandbox.insert_account(beneficiary.clone(), 0).await;

    let system = FactorySystem::new(&config, payload, sandbox.clone());

    let span = tracing::info_span!("create_daos");
    async {
        for (at, name) in [(1, "alice.test"), (2, "bob.test")] {
            let ctx = CallContext::new(caller.clone(), 10, at);
            match system.client.create_dao(ctx, name, REQUIRED_DEPOSIT).await {
                Ok(batch) => info!(%name, ticket = %batch.ticket, "Create requested"),
                Err(e) => error!(%name, error = %e, "Create failed"),
            }
        }
    }
    .instrument(span)
    .await;
    system.settled().await.map_err(|e| e.to_string())?;

    let ctx = CallContext::new(caller.clone(), 0, 3);
    match system
        .client
        .delete_dao(ctx, "alice.test", beneficiary.as_str())
        .await
    {
        Ok(batch) => info!(ticket = %batch.ticket, "Delete requested"),
        Err(e) => error!(error = %e, "Delete failed"),
    }
    system.settled().await.map_err(|e| e.to_string())?;

    let len = system
        .client
        .get_dao_list_length()
        .await
        .map_err(|e| e.to_string())?;
    let live = system
        .client
        .get_dao_list(0, len)
        .await
        .map_err(|e| e.to_string())?;
    let refunded = sandbox.account(&beneficiary).await.map_or(0, |a| a.balance);
    info!(len, live = live.len(), refunded, "Registry state");
    for entry in &live {
        info!(identifier = %entry.identifier, created_at = entry.created_at, creator = %entry.creator, "Live");
    }

    system.shutdown().await?;

    info!("Demo completed successfully");
    Ok(())
}
