//! Ledger error taxonomy

use crate::core::address::Address;
use crate::core::units::{UsdWad, Wei, format_usd};
use thiserror::Error;

fn usd(value: &UsdWad) -> String {
    format_usd(*value)
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error(
        "not enough funds: contribution worth {} is below the {} minimum",
        usd(.usd_value),
        usd(.minimum)
    )]
    NotEnoughFunds { usd_value: UsdWad, minimum: UsdWad },

    #[error("funder cap of {cap} reached")]
    FunderCapReached { cap: usize },

    #[error("arithmetic overflow")]
    Overflow,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationError {
    #[error("caller {caller} is not the owner")]
    NotOwner { caller: Address },
}

/// Failure to obtain a usable price reading.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    #[error("oracle reported a non-positive price: {answer}")]
    InvalidPrice { answer: i128 },

    #[error("oracle price is stale: updated {age_secs}s ago, limit is {max_age_secs}s")]
    StalePrice { age_secs: u64, max_age_secs: u64 },

    #[error("oracle query failed: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoundsError {
    #[error("index {index} out of range for {len} funders")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Value could not be delivered to its recipient.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("transfer of {amount} wei to {to} rejected: {reason}")]
    Rejected {
        to: Address,
        amount: Wei,
        reason: String,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Authorization(#[from] AuthorizationError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Bounds(#[from] BoundsError),

    #[error(transparent)]
    Transfer(#[from] TransferError),
}
