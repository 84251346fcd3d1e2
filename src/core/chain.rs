//! Local execution environment around a funding ledger.

use crate::core::address::Address;
use crate::core::error::LedgerError;
use crate::core::ledger::FundingLedger;
use crate::core::units::{UsdWad, Wei};
use crate::core::wallet::Wallets;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("unknown account {0}")]
    UnknownAccount(Address),

    #[error("account {account} holds {available} wei, cannot send {required}")]
    InsufficientBalance {
        account: Address,
        required: Wei,
        available: Wei,
    },

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

#[derive(Debug)]
pub struct LocalChain {
    ledger: FundingLedger,
    wallets: Wallets,
}

impl LocalChain {
    pub fn new(ledger: FundingLedger, wallets: Wallets) -> Self {
        Self { ledger, wallets }
    }

    pub fn ledger(&self) -> &FundingLedger {
        &self.ledger
    }

    pub fn wallets(&self) -> &Wallets {
        &self.wallets
    }

    /// Sends `amount` from `from`'s wallet to the ledger.
    pub async fn fund(&mut self, from: Address, amount: Wei) -> Result<UsdWad, ChainError> {
        if !self.wallets.contains(&from) {
            return Err(ChainError::UnknownAccount(from));
        }
        // Value leaves the wallet with the call
        let available = self.wallets.balance(&from);
        if self.wallets.debit(from, amount).is_none() {
            return Err(ChainError::InsufficientBalance {
                account: from,
                required: amount,
                available,
            });
        }

        match self.ledger.fund(from, amount).await {
            Ok(usd_value) => Ok(usd_value),
            Err(e) => {
                // Rejected calls keep no value
                debug!(%from, amount, "Returning attached value to sender");
                self.wallets.credit(from, amount);
                Err(e.into())
            }
        }
    }

    /// Withdraws the ledger balance into the owner's wallet on behalf of `from`.
    pub fn withdraw(&mut self, from: Address) -> Result<Wei, ChainError> {
        // No value is attached, so the caller needs no wallet.
        Ok(self.ledger.withdraw(from, &mut self.wallets)?)
    }
}
