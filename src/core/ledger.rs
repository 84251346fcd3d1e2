//! Price-gated funding ledger with owner-only withdrawal.

use crate::core::access::OwnerGuard;
use crate::core::address::Address;
use crate::core::conversion::convert_to_usd;
use crate::core::error::{BoundsError, LedgerError, TransferError, ValidationError};
use crate::core::price::{PriceOracle, PriceReading};
use crate::core::units::{UsdWad, Wei, format_ether, format_usd};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerConfig {
    pub owner: Address,
    pub minimum_usd: UsdWad,
    pub max_funders: Option<usize>,
}

/// Receives value leaving the ledger. The ledger is handed over so the payee
/// may call back into it mid-transfer.
pub trait Payee {
    fn receive(
        &mut self,
        ledger: &mut FundingLedger,
        to: Address,
        amount: Wei,
    ) -> Result<(), TransferError>;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("snapshot is bound to oracle {expected}, got {actual}")]
    OracleMismatch { expected: Address, actual: Address },

    #[error("inconsistent snapshot: {0}")]
    Inconsistent(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub owner: Address,
    pub minimum_usd: UsdWad,
    #[serde(default)]
    pub max_funders: Option<usize>,
    pub price_oracle: Address,
    pub funders: Vec<Address>,
    pub contributions: BTreeMap<Address, Wei>,
    pub balance: Wei,
}

// Between calls: contributions sum to `balance`, and an address has a
// nonzero contribution iff it is listed exactly once in `funders`.
pub struct FundingLedger {
    access: OwnerGuard,
    minimum_usd: UsdWad,
    max_funders: Option<usize>,
    oracle: Arc<dyn PriceOracle>,
    funders: Vec<Address>,
    contributions: HashMap<Address, Wei>,
    balance: Wei,
}

impl std::fmt::Debug for FundingLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FundingLedger")
            .field("owner", &self.access.owner())
            .field("minimum_usd", &self.minimum_usd)
            .field("max_funders", &self.max_funders)
            .field("oracle", &self.oracle.address())
            .field("funders", &self.funders)
            .field("contributions", &self.contributions)
            .field("balance", &self.balance)
            .finish()
    }
}

impl FundingLedger {
    pub fn new(config: LedgerConfig, oracle: Arc<dyn PriceOracle>) -> Self {
        info!(
            owner = %config.owner,
            oracle = %oracle.address(),
            minimum = %format_usd(config.minimum_usd),
            "Ledger created"
        );
        Self {
            access: OwnerGuard::new(config.owner),
            minimum_usd: config.minimum_usd,
            max_funders: config.max_funders,
            oracle,
            funders: Vec::new(),
            contributions: HashMap::new(),
            balance: 0,
        }
    }

    pub fn restore(
        snapshot: LedgerSnapshot,
        oracle: Arc<dyn PriceOracle>,
    ) -> Result<Self, SnapshotError> {
        // The oracle is fixed at deployment
        if snapshot.price_oracle != oracle.address() {
            return Err(SnapshotError::OracleMismatch {
                expected: snapshot.price_oracle,
                actual: oracle.address(),
            });
        }

        // Each funder once, each with a positive contribution
        let mut seen = HashSet::new();
        for funder in &snapshot.funders {
            if !seen.insert(*funder) {
                return Err(SnapshotError::Inconsistent(format!(
                    "funder {funder} listed twice"
                )));
            }
            match snapshot.contributions.get(funder) {
                Some(amount) if *amount > 0 => {}
                _ => {
                    return Err(SnapshotError::Inconsistent(format!(
                        "funder {funder} has no contribution"
                    )));
                }
            }
        }
        if snapshot.contributions.len() != snapshot.funders.len() {
            return Err(SnapshotError::Inconsistent(
                "contribution recorded for an address missing from funders".to_string(),
            ));
        }
        let total = snapshot
            .contributions
            .values()
            .try_fold(0u128, |acc, v| acc.checked_add(*v));
        if total != Some(snapshot.balance) {
            return Err(SnapshotError::Inconsistent(format!(
                "contributions do not add up to balance {}",
                snapshot.balance
            )));
        }

        debug!(funders = snapshot.funders.len(), "Ledger restored");
        Ok(Self {
            access: OwnerGuard::new(snapshot.owner),
            minimum_usd: snapshot.minimum_usd,
            max_funders: snapshot.max_funders,
            oracle,
            funders: snapshot.funders,
            contributions: snapshot.contributions.into_iter().collect(),
            balance: snapshot.balance,
        })
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            owner: self.access.owner(),
            minimum_usd: self.minimum_usd,
            max_funders: self.max_funders,
            price_oracle: self.oracle.address(),
            funders: self.funders.clone(),
            contributions: self
                .contributions
                .iter()
                .map(|(k, v)| (*k, *v))
                .collect(),
            balance: self.balance,
        }
    }

    /// Accepts `amount` wei from `sender` and returns its USD value.
    pub async fn fund(&mut self, sender: Address, amount: Wei) -> Result<UsdWad, LedgerError> {
        // One query per call; nothing is touched until it returns
        let reading = self.oracle.latest_price().await.inspect_err(|e| {
            warn!(%sender, error = %e, "Funding aborted, no usable price");
        })?;
        debug!(
            price = reading.price,
            decimals = reading.decimals,
            "Oracle price received"
        );
        self.admit(sender, amount, &reading)
    }

    fn admit(
        &mut self,
        sender: Address,
        amount: Wei,
        reading: &PriceReading,
    ) -> Result<UsdWad, LedgerError> {
        let usd_value = convert_to_usd(amount, reading.price, reading.decimals)
            .ok_or(ValidationError::Overflow)?;
        if amount == 0 || usd_value < self.minimum_usd {
            warn!(
                %sender,
                amount = %format_ether(amount),
                value = %format_usd(usd_value),
                "Contribution below minimum"
            );
            return Err(ValidationError::NotEnoughFunds {
                usd_value,
                minimum: self.minimum_usd,
            }
            .into());
        }

        // The cap only applies to new funders
        let previous = self.contributions.get(&sender).copied();
        if previous.is_none()
            && let Some(cap) = self.max_funders
            && self.funders.len() >= cap
        {
            warn!(%sender, cap, "Funder cap reached");
            return Err(ValidationError::FunderCapReached { cap }.into());
        }
        let contribution = previous
            .unwrap_or(0)
            .checked_add(amount)
            .ok_or(ValidationError::Overflow)?;
        let balance = self
            .balance
            .checked_add(amount)
            .ok_or(ValidationError::Overflow)?;

        // All checks passed, commit
        if previous.is_none() {
            self.funders.push(sender);
        }
        self.contributions.insert(sender, contribution);
        self.balance = balance;

        info!(
            %sender,
            amount = %format_ether(amount),
            value = %format_usd(usd_value),
            "Contribution accepted"
        );
        Ok(usd_value)
    }

    /// Sends the whole balance to the owner and resets all bookkeeping.
    pub fn withdraw(&mut self, caller: Address, payee: &mut dyn Payee) -> Result<Wei, LedgerError> {
        self.access.only_owner(caller)?;

        // Reset before paying out so a reentrant call sees an empty ledger
        let owner = self.access.owner();
        let amount = self.balance;
        let funders = std::mem::take(&mut self.funders);
        let contributions = std::mem::take(&mut self.contributions);
        self.balance = 0;
        debug!(funders = funders.len(), "Ledger reset ahead of payout");

        if let Err(e) = payee.receive(self, owner, amount) {
            // Undo everything, including whatever the payee did in between
            warn!(error = %e, "Payout failed, restoring ledger");
            self.funders = funders;
            self.contributions = contributions;
            self.balance = amount;
            return Err(e.into());
        }

        info!(%owner, amount = %format_ether(amount), funders = funders.len(), "Withdrawal complete");
        Ok(amount)
    }

    pub fn owner(&self) -> Address {
        self.access.owner()
    }

    pub fn price_oracle(&self) -> Address {
        self.oracle.address()
    }

    pub fn oracle(&self) -> &Arc<dyn PriceOracle> {
        &self.oracle
    }

    pub fn funder_at(&self, index: usize) -> Result<Address, BoundsError> {
        self.funders
            .get(index)
            .copied()
            .ok_or(BoundsError::IndexOutOfRange {
                index,
                len: self.funders.len(),
            })
    }

    /// Total contributed by `funder` since the last withdrawal; 0 if unknown.
    pub fn contribution(&self, funder: &Address) -> Wei {
        self.contributions.get(funder).copied().unwrap_or(0)
    }

    pub fn funders(&self) -> &[Address] {
        &self.funders
    }

    pub fn funder_count(&self) -> usize {
        self.funders.len()
    }

    pub fn balance(&self) -> Wei {
        self.balance
    }

    pub fn minimum_usd(&self) -> UsdWad {
        self.minimum_usd
    }
}
