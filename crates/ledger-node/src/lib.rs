//! # DPoS Ledger Node
//!
//! Hosts a [`LedgerService`] behind an HTTP API.
//!
//! ## Modules
//!
//! - `config` - Node configuration from the environment
//! - `genesis` - Initial voters, delegates, and votes
//! - `scheduler` - When elections run
//! - `api` - axum router and handlers
//!
//! ## Startup Sequence
//!
//! 1. Initialize telemetry
//! 2. Load and validate configuration
//! 3. Create the ledger (builds the genesis block)
//! 4. Apply the genesis registry and elect the first committee
//! 5. Serve HTTP until Ctrl+C

pub mod api;
pub mod config;
pub mod genesis;
pub mod scheduler;

use std::sync::Arc;

use dpos_ledger::{ContentHashMinter, LedgerService};
use tracing::info;

pub use api::{router, AppState};
pub use config::{ConfigError, NodeConfig};
pub use genesis::{GenesisError, GenesisRegistry};
pub use scheduler::ElectionSchedule;

/// Build the ledger and shared handler state from configuration.
///
/// Applies the genesis registry if one is configured.
pub fn build_state(config: &NodeConfig) -> anyhow::Result<AppState> {
    use anyhow::Context;

    let ledger = Arc::new(
        LedgerService::new(config.ledger.clone()).context("Failed to create ledger service")?,
    );

    if let Some(path) = &config.genesis_file {
        let registry = GenesisRegistry::load(path)?;
        registry
            .apply(&ledger)
            .with_context(|| format!("Failed to apply genesis registry {}", path.display()))?;
    } else {
        info!("No genesis registry configured; committee is empty until votes arrive");
    }

    Ok(AppState {
        ledger,
        schedule: config.election,
        minter: Arc::new(ContentHashMinter),
    })
}
