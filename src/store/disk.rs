use super::{Deployment, DeploymentStore};
use anyhow::{Context, Result};
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

const PARTITION: &str = "deployments";

/// Deployments kept in a fjall keyspace, keyed by network name.
pub struct DiskStore {
    keyspace: Keyspace,
    deployments: PartitionHandle,
}

impl DiskStore {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create data directory: {}", path.display()))?;
        let keyspace = Config::new(path.join("state"))
            .open()
            .with_context(|| format!("Failed to open state store in {}", path.display()))?;
        let deployments = keyspace.open_partition(PARTITION, PartitionCreateOptions::default())?;
        debug!("Opened state store at {}", path.display());
        Ok(Self {
            keyspace,
            deployments,
        })
    }
}

impl DeploymentStore for DiskStore {
    fn load(&self, network: &str) -> Result<Option<Deployment>> {
        let Some(bytes) = self.deployments.get(network)? else {
            debug!(network, "No stored deployment");
            return Ok(None);
        };
        let deployment = serde_json::from_slice(&bytes)
            .with_context(|| format!("Corrupt deployment record for network '{network}'"))?;
        Ok(Some(deployment))
    }

    fn save(&self, deployment: &Deployment) -> Result<()> {
        let bytes = serde_json::to_vec(deployment)?;
        self.deployments.insert(deployment.network.as_str(), bytes)?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!(network = %deployment.network, "Deployment saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::sample_deployment;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let store = DiskStore::open(dir.path()).unwrap();

        assert!(store.load("hardhat").unwrap().is_none());

        let deployment = sample_deployment("hardhat");
        store.save(&deployment).unwrap();
        assert_eq!(store.load("hardhat").unwrap(), Some(deployment));
        assert!(store.load("localhost").unwrap().is_none());
    }

    #[test]
    fn test_survives_reopen() {
        let dir = tempdir().unwrap();
        let deployment = sample_deployment("localhost");
        {
            let store = DiskStore::open(dir.path()).unwrap();
            store.save(&deployment).unwrap();
        }

        let store = DiskStore::open(dir.path()).unwrap();
        assert_eq!(store.load("localhost").unwrap(), Some(deployment));
    }

    #[test]
    fn test_save_replaces_previous_deployment() {
        let dir = tempdir().unwrap();
        let store = DiskStore::open(dir.path()).unwrap();
        store.save(&sample_deployment("hardhat")).unwrap();

        let mut redeployed = sample_deployment("hardhat");
        redeployed.ledger.funders.clear();
        redeployed.ledger.contributions.clear();
        redeployed.ledger.balance = 0;
        store.save(&redeployed).unwrap();

        assert_eq!(store.load("hardhat").unwrap(), Some(redeployed));
    }
}
