use crate::core::address::Address;
use crate::core::ledger::LedgerConfig;
use crate::core::units::{Wei, to_wad};
use crate::core::wallet::Wallets;
use crate::providers::mock::{DEFAULT_DECIMALS, DEFAULT_INITIAL_ANSWER};
use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

/// Well-known local development accounts.
const DEV_ACCOUNTS: [&str; 6] = [
    "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
    "0x70997970C51812dc3A010C7d01b50e0d17dc79C8",
    "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC",
    "0x90F79bf6EB2c4f870365E785982E1f101E93b906",
    "0x15d34AAf54267DB7D7c367839AAf71A00a2C6A65",
    "0x9965507D1a55bcC2695C58ba16FB37d819B0A4dc",
];

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct NetworkConfig {
    pub chain_id: u64,
    pub eth_usd_price_feed: Option<Address>,
    pub rpc_url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct MockFeedConfig {
    pub decimals: u8,
    pub initial_answer: i64,
}

impl Default for MockFeedConfig {
    fn default() -> Self {
        MockFeedConfig {
            decimals: DEFAULT_DECIMALS,
            initial_answer: DEFAULT_INITIAL_ANSWER as i64,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LedgerSettings {
    /// Minimum contribution in whole USD.
    pub minimum_usd: Decimal,
    pub max_funders: Option<usize>,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        LedgerSettings {
            minimum_usd: Decimal::from(50),
            max_funders: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AccountConfig {
    pub address: Address,
    /// Opening balance in whole native units.
    pub balance: Decimal,
}

fn default_network() -> String {
    "hardhat".to_string()
}

fn default_development_chains() -> Vec<String> {
    vec!["hardhat".to_string(), "localhost".to_string()]
}

fn default_networks() -> BTreeMap<String, NetworkConfig> {
    let feed = |s: &str| s.parse().ok();
    BTreeMap::from([
        (
            "rinkeby".to_string(),
            NetworkConfig {
                chain_id: 4,
                eth_usd_price_feed: feed("0x78F9e60608bF48a1155b4B2A5e31F32318a1d85F"),
                rpc_url: None,
            },
        ),
        (
            "polygon".to_string(),
            NetworkConfig {
                chain_id: 137,
                eth_usd_price_feed: feed("0xF9680D99D6C9589e2a93a78A04A279e509205945"),
                rpc_url: None,
            },
        ),
    ])
}

fn default_accounts() -> Vec<AccountConfig> {
    DEV_ACCOUNTS
        .iter()
        .filter_map(|a| a.parse().ok())
        .map(|address| AccountConfig {
            address,
            balance: Decimal::from(10_000),
        })
        .collect()
}

fn default_max_price_age_secs() -> Option<u64> {
    Some(3600)
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_network")]
    pub network: String,
    #[serde(default = "default_development_chains")]
    pub development_chains: Vec<String>,
    #[serde(default = "default_networks")]
    pub networks: BTreeMap<String, NetworkConfig>,
    #[serde(default)]
    pub mock: MockFeedConfig,
    #[serde(default)]
    pub ledger: LedgerSettings,
    #[serde(default = "default_max_price_age_secs")]
    pub max_price_age_secs: Option<u64>,
    #[serde(default = "default_accounts")]
    pub accounts: Vec<AccountConfig>,
    pub data_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            network: default_network(),
            development_chains: default_development_chains(),
            networks: default_networks(),
            mock: MockFeedConfig::default(),
            ledger: LedgerSettings::default(),
            max_price_age_secs: default_max_price_age_secs(),
            accounts: default_accounts(),
            data_path: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "fundme", "fundme")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("dev", "fundme", "fundme")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn is_development(&self, network: &str) -> bool {
        self.development_chains.iter().any(|n| n == network)
    }

    pub fn network_config(&self, network: &str) -> Result<&NetworkConfig> {
        self.networks
            .get(network)
            .ok_or_else(|| anyhow!("Network '{network}' is not configured"))
    }

    pub fn max_price_age(&self) -> Option<Duration> {
        self.max_price_age_secs.map(Duration::from_secs)
    }

    pub fn deployer(&self) -> Result<Address> {
        // First account deploys and owns the ledger
        self.accounts
            .first()
            .map(|a| a.address)
            .context("No accounts configured")
    }

    pub fn ledger_config(&self) -> Result<LedgerConfig> {
        Ok(LedgerConfig {
            owner: self.deployer()?,
            minimum_usd: to_wad(self.ledger.minimum_usd).context("Invalid ledger.minimum_usd")?,
            max_funders: self.ledger.max_funders,
        })
    }

    pub fn genesis_wallets(&self) -> Result<Wallets> {
        let mut wallets = Wallets::new();
        for account in &self.accounts {
            // Config balances are whole units
            let balance: Wei = to_wad(account.balance)
                .with_context(|| format!("Invalid balance for account {}", account.address))?;
            wallets.open(account.address, balance);
        }
        Ok(wallets)
    }

    pub fn resolve_account(&self, account: &str) -> Result<Address> {
        // Index into `accounts` first, then a literal address
        if let Ok(index) = account.parse::<usize>() {
            return self
                .accounts
                .get(index)
                .map(|a| a.address)
                .ok_or_else(|| anyhow!("No account at index {index}"));
        }
        match account.parse::<Address>() {
            Ok(address) => Ok(address),
            Err(e) => bail!("Invalid account '{account}': {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::units::WAD;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
network: rinkeby
development_chains: [hardhat]
networks:
  rinkeby:
    chain_id: 4
    eth_usd_price_feed: "0x78F9e60608bF48a1155b4B2A5e31F32318a1d85F"
    rpc_url: "http://localhost:8545"
mock:
  decimals: 6
  initial_answer: 1500000000
ledger:
  minimum_usd: "12.5"
  max_funders: 3
max_price_age_secs: 60
accounts:
  - address: "0x0000000000000000000000000000000000000001"
    balance: "2.5"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.network, "rinkeby");
        assert!(config.is_development("hardhat"));
        assert!(!config.is_development("localhost"));

        let rinkeby = config.network_config("rinkeby").unwrap();
        assert_eq!(rinkeby.chain_id, 4);
        assert_eq!(
            rinkeby.eth_usd_price_feed.unwrap().to_string(),
            "0x78f9e60608bf48a1155b4b2a5e31f32318a1d85f"
        );
        assert_eq!(rinkeby.rpc_url.as_deref(), Some("http://localhost:8545"));
        assert!(config.network_config("polygon").is_err());

        assert_eq!(config.mock.decimals, 6);
        assert_eq!(config.mock.initial_answer, 1_500_000_000);
        assert_eq!(config.max_price_age(), Some(Duration::from_secs(60)));

        let ledger = config.ledger_config().unwrap();
        assert_eq!(ledger.owner, Address::from_low_u64(1));
        assert_eq!(ledger.minimum_usd, 12 * WAD + WAD / 2);
        assert_eq!(ledger.max_funders, Some(3));

        let wallets = config.genesis_wallets().unwrap();
        assert_eq!(wallets.balance(&Address::from_low_u64(1)), 2 * WAD + WAD / 2);
    }

    #[test]
    fn test_defaults() {
        let config: AppConfig = serde_yaml::from_str("data_path: /tmp/fundme").unwrap();
        assert_eq!(config.network, "hardhat");
        assert!(config.is_development("localhost"));
        assert_eq!(config.networks["polygon"].chain_id, 137);
        assert!(config.networks["rinkeby"].eth_usd_price_feed.is_some());
        assert_eq!(config.mock, MockFeedConfig::default());
        assert_eq!(config.accounts.len(), 6);
        assert_eq!(config.max_price_age_secs, Some(3600));
        assert_eq!(config.ledger_config().unwrap().minimum_usd, 50 * WAD);
        assert_eq!(
            config.default_data_path().unwrap(),
            PathBuf::from("/tmp/fundme")
        );
    }

    #[test]
    fn test_resolve_account() {
        let config = AppConfig::default();
        assert_eq!(
            config.resolve_account("0").unwrap(),
            config.deployer().unwrap()
        );
        assert_eq!(
            config.resolve_account("1").unwrap().to_string(),
            "0x70997970c51812dc3a010c7d01b50e0d17dc79c8"
        );
        assert_eq!(
            config
                .resolve_account("0x0000000000000000000000000000000000000009")
                .unwrap(),
            Address::from_low_u64(9)
        );
        assert!(config.resolve_account("17").is_err());
        assert!(config.resolve_account("nobody").is_err());
    }
}
