//! Owner-only access control.

use crate::core::address::Address;
use crate::core::error::AuthorizationError;
use tracing::warn;

/// Holds the owner identity of a ledger. Ownership cannot be transferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerGuard {
    owner: Address,
}

impl OwnerGuard {
    pub fn new(owner: Address) -> Self {
        Self { owner }
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn is_owner(&self, caller: Address) -> bool {
        caller == self.owner
    }

    /// Fails with `NotOwner` unless `caller` is the owner.
    pub fn only_owner(&self, caller: Address) -> Result<(), AuthorizationError> {
        if !self.is_owner(caller) {
            warn!(%caller, owner = %self.owner, "Rejected call from non-owner");
            return Err(AuthorizationError::NotOwner { caller });
        }
        Ok(())
    }
}
