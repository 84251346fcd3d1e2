use super::{Deployment, DeploymentStore};
use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

// Records are serialized like on disk so both stores round-trip the same data
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DeploymentStore for MemoryStore {
    fn load(&self, network: &str) -> Result<Option<Deployment>> {
        let inner = self.inner.read().map_err(|_| anyhow!("Store lock poisoned"))?;
        inner
            .get(network)
            .map(|bytes| serde_json::from_slice(bytes).map_err(Into::into))
            .transpose()
    }

    fn save(&self, deployment: &Deployment) -> Result<()> {
        let bytes = serde_json::to_vec(deployment)?;
        let mut inner = self.inner.write().map_err(|_| anyhow!("Store lock poisoned"))?;
        inner.insert(deployment.network.clone(), bytes);
        debug!(network = %deployment.network, "Deployment saved in memory");
        Ok(())
    }
}
