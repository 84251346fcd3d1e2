//! External account balances.

use crate::core::address::Address;
use crate::core::error::TransferError;
use crate::core::ledger::{FundingLedger, Payee};
use crate::core::units::Wei;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Native balances of accounts outside the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallets {
    balances: BTreeMap<Address, Wei>,
}

impl Wallets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self, account: &Address) -> Wei {
        self.balances.get(account).copied().unwrap_or(0)
    }

    pub fn contains(&self, account: &Address) -> bool {
        self.balances.contains_key(account)
    }

    pub fn open(&mut self, account: Address, balance: Wei) {
        self.balances.insert(account, balance);
    }

    pub fn credit(&mut self, account: Address, amount: Wei) -> Option<Wei> {
        let entry = self.balances.entry(account).or_insert(0);
        *entry = entry.checked_add(amount)?;
        debug!(%account, amount, balance = *entry, "Wallet credited");
        Some(*entry)
    }

    /// Removes `amount` from `account`; `None` if the balance is too low.
    pub fn debit(&mut self, account: Address, amount: Wei) -> Option<Wei> {
        let entry = self.balances.get_mut(&account)?;
        *entry = entry.checked_sub(amount)?;
        debug!(%account, amount, balance = *entry, "Wallet debited");
        Some(*entry)
    }
}

impl Payee for Wallets {
    fn receive(
        &mut self,
        _ledger: &mut FundingLedger,
        to: Address,
        amount: Wei,
    ) -> Result<(), TransferError> {
        self.credit(to, amount)
            .map(|_| ())
            .ok_or_else(|| TransferError::Rejected {
                to,
                amount,
                reason: "recipient balance overflow".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit_and_debit() {
        let alice = Address::from_low_u64(1);
        let mut wallets = Wallets::new();
        wallets.open(alice, 100);

        assert_eq!(wallets.debit(alice, 40), Some(60));
        assert_eq!(wallets.debit(alice, 61), None);
        assert_eq!(wallets.balance(&alice), 60);
        assert_eq!(wallets.credit(alice, 5), Some(65));
    }

    #[test]
    fn test_unknown_account() {
        let bob = Address::from_low_u64(2);
        let mut wallets = Wallets::new();
        assert_eq!(wallets.balance(&bob), 0);
        assert_eq!(wallets.debit(bob, 1), None);
        assert!(!wallets.contains(&bob));

        assert_eq!(wallets.credit(bob, 7), Some(7));
        assert!(wallets.contains(&bob));
    }

    #[test]
    fn test_credit_overflow() {
        let alice = Address::from_low_u64(1);
        let mut wallets = Wallets::new();
        wallets.open(alice, u128::MAX);
        assert_eq!(wallets.credit(alice, 1), None);
        assert_eq!(wallets.balance(&alice), u128::MAX);
    }
}
