//! Ledger rules, amounts and the price oracle seam

pub mod access;
pub mod address;
pub mod chain;
pub mod config;
pub mod conversion;
pub mod error;
pub mod ledger;
pub mod log;
pub mod price;
pub mod units;
pub mod wallet;

// Re-export main types for cleaner imports
pub use address::Address;
pub use ledger::{FundingLedger, LedgerConfig, Payee};
pub use price::{PriceOracle, PriceReading};
