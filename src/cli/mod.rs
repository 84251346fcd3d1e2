//! Command implementations. Each command returns the text to print.

pub mod deploy;
pub mod fund;
pub mod price;
pub mod setup;
pub mod status;
pub mod ui;
pub mod withdraw;

use crate::core::chain::LocalChain;
use crate::core::config::AppConfig;
use crate::core::ledger::FundingLedger;
use crate::providers::resolver::resolve_oracle;
use crate::store::{Deployment, DeploymentStore};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::debug;

/// A loaded deployment plus the metadata needed to write it back.
pub struct OpenChain {
    pub chain: LocalChain,
    pub deployed_at: DateTime<Utc>,
}

/// Binds a configuration, a network and a store for one command.
pub struct Session<'a> {
    pub config: &'a AppConfig,
    pub network: String,
    pub store: &'a dyn DeploymentStore,
}

impl<'a> Session<'a> {
    pub fn new(config: &'a AppConfig, network: &str, store: &'a dyn DeploymentStore) -> Self {
        Self {
            config,
            network: network.to_string(),
            store,
        }
    }

    pub fn open_chain(&self) -> Result<OpenChain> {
        let deployment = self.store.load(&self.network)?.with_context(|| {
            format!(
                "Nothing deployed on network '{}'. Run `fundme deploy` first",
                self.network
            )
        })?;
        let oracle = resolve_oracle(self.config, &self.network)?;
        let ledger = FundingLedger::restore(deployment.ledger, oracle)
            .with_context(|| format!("Stored ledger on '{}' cannot be restored", self.network))?;
        debug!(network = %self.network, "Deployment loaded");
        Ok(OpenChain {
            chain: LocalChain::new(ledger, deployment.wallets),
            deployed_at: deployment.deployed_at,
        })
    }

    pub fn commit(&self, open: &OpenChain) -> Result<()> {
        self.store.save(&Deployment {
            network: self.network.clone(),
            deployed_at: open.deployed_at,
            ledger: open.chain.ledger().snapshot(),
            wallets: open.chain.wallets().clone(),
        })
    }

    /// Resolves `--from`, defaulting to the deployer.
    pub fn sender(&self, from: Option<&str>) -> Result<crate::core::address::Address> {
        match from {
            Some(account) => self.config.resolve_account(account),
            None => self.config.deployer(),
        }
    }
}
