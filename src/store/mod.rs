//! Persisted deployments, one per network.

pub mod disk;
pub mod memory;

use crate::core::ledger::LedgerSnapshot;
use crate::core::wallet::Wallets;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything needed to bring a network's ledger back between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    pub network: String,
    pub deployed_at: DateTime<Utc>,
    pub ledger: LedgerSnapshot,
    pub wallets: Wallets,
}

pub trait DeploymentStore: Send + Sync {
    fn load(&self, network: &str) -> Result<Option<Deployment>>;

    /// Replaces the stored deployment for `deployment.network`.
    fn save(&self, deployment: &Deployment) -> Result<()>;
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::core::address::Address;
    use std::collections::BTreeMap;

    pub fn sample_deployment(network: &str) -> Deployment {
        let funder = Address::from_low_u64(2);
        let mut wallets = Wallets::new();
        wallets.open(Address::from_low_u64(1), 1_000);
        wallets.open(funder, 500);
        Deployment {
            network: network.to_string(),
            deployed_at: Utc::now(),
            ledger: LedgerSnapshot {
                owner: Address::from_low_u64(1),
                minimum_usd: 50,
                max_funders: None,
                price_oracle: Address::from_low_u64(99),
                funders: vec![funder],
                contributions: BTreeMap::from([(funder, 250)]),
                balance: 250,
            },
            wallets,
        }
    }
}
