//! DRIV daemon
//!
//! Opens the vault store for the lifetime of the process and closes it on
//! ctrl-c.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use driv_vault::{DrivConfig, DrivVault};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("Starting DRIV vault daemon v{}", driv_common::VERSION);

    let config = DrivConfig::load()?;
    info!("Loaded configuration: {:?}", config);

    let vault = DrivVault::in_memory(config);
    info!(
        "Quorum: policy={}, unlock_write={:?}, retrigger_on_status_update={}, validate_submitter={}",
        vault.config().quorum.policy,
        vault.config().quorum.unlock_write,
        vault.config().verification.retrigger_on_status_update,
        vault.config().verification.validate_submitter
    );

    tokio::signal::ctrl_c().await?;
    info!("Received shutdown signal");

    vault.shutdown().await?;
    info!("Shutting down DRIV vault daemon");
    Ok(())
}
