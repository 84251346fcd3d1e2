//! Price oracle abstractions and core types

use crate::core::address::Address;
use crate::core::error::OracleError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// A validated price of one native unit in USD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceReading {
    // Always > 0
    pub price: u128,
    pub decimals: u8,
    pub updated_at: Option<DateTime<Utc>>,
}

impl PriceReading {
    pub fn from_answer(
        answer: i128,
        decimals: u8,
        updated_at: Option<DateTime<Utc>>,
    ) -> Result<Self, OracleError> {
        if answer <= 0 {
            return Err(OracleError::InvalidPrice { answer });
        }
        Ok(Self {
            price: answer.unsigned_abs(),
            decimals,
            updated_at,
        })
    }

    pub fn ensure_fresh(&self, max_age: Duration, now: DateTime<Utc>) -> Result<(), OracleError> {
        // No timestamp counts as fresh
        let Some(updated_at) = self.updated_at else {
            return Ok(());
        };
        let age_secs = (now - updated_at).num_seconds().max(0) as u64;
        if age_secs > max_age.as_secs() {
            return Err(OracleError::StalePrice {
                age_secs,
                max_age_secs: max_age.as_secs(),
            });
        }
        Ok(())
    }
}

#[async_trait]
pub trait PriceOracle: Send + Sync {
    fn address(&self) -> Address;

    /// Fetches the latest price. Never returns a non-positive price.
    async fn latest_price(&self) -> Result<PriceReading, OracleError>;
}

#[async_trait]
impl<T: PriceOracle + ?Sized> PriceOracle for Arc<T> {
    fn address(&self) -> Address {
        self.as_ref().address()
    }

    async fn latest_price(&self) -> Result<PriceReading, OracleError> {
        self.as_ref().latest_price().await
    }
}
