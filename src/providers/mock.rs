//! Configurable price feed for development networks and tests.

use crate::core::address::Address;
use crate::core::error::OracleError;
use crate::core::price::{PriceOracle, PriceReading};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

pub const DEFAULT_DECIMALS: u8 = 8;
pub const DEFAULT_INITIAL_ANSWER: i128 = 200_000_000_000;

/// Address the mock feed is "deployed" at on local networks.
pub const MOCK_FEED_ADDRESS: Address = Address::new([
    0x5f, 0xbd, 0xb2, 0x31, 0x56, 0x78, 0xaf, 0xec, 0xb3, 0x67, 0xf0, 0x32, 0xd9, 0x3f, 0x64, 0x2f,
    0x64, 0x18, 0x0a, 0xa3,
]);

#[derive(Debug)]
struct Round {
    id: u64,
    answer: i128,
    updated_at: DateTime<Utc>,
}

/// Price feed returning injected answers.
#[derive(Debug)]
pub struct MockV3Aggregator {
    address: Address,
    decimals: u8,
    round: RwLock<Round>,
}

impl MockV3Aggregator {
    pub fn new(decimals: u8, initial_answer: i128) -> Self {
        Self::at(MOCK_FEED_ADDRESS, decimals, initial_answer)
    }

    pub fn at(address: Address, decimals: u8, initial_answer: i128) -> Self {
        Self {
            address,
            decimals,
            round: RwLock::new(Round {
                id: 1,
                answer: initial_answer,
                updated_at: Utc::now(),
            }),
        }
    }

    /// Starts a new round with `answer`.
    pub async fn update_answer(&self, answer: i128) {
        let mut round = self.round.write().await;
        round.id += 1;
        round.answer = answer;
        round.updated_at = Utc::now();
        debug!(round = round.id, answer, "Mock feed answer updated");
    }

    pub async fn round_id(&self) -> u64 {
        self.round.read().await.id
    }
}

impl Default for MockV3Aggregator {
    fn default() -> Self {
        Self::new(DEFAULT_DECIMALS, DEFAULT_INITIAL_ANSWER)
    }
}

#[async_trait]
impl PriceOracle for MockV3Aggregator {
    fn address(&self) -> Address {
        self.address
    }

    async fn latest_price(&self) -> Result<PriceReading, OracleError> {
        let round = self.round.read().await;
        debug!(round = round.id, answer = round.answer, "Mock feed queried");
        PriceReading::from_answer(round.answer, self.decimals, Some(round.updated_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_answer() {
        let feed = MockV3Aggregator::default();
        let reading = feed.latest_price().await.unwrap();
        assert_eq!(reading.price, 200_000_000_000);
        assert_eq!(reading.decimals, 8);
        assert!(reading.updated_at.is_some());
        assert_eq!(feed.address(), MOCK_FEED_ADDRESS);
    }

    #[tokio::test]
    async fn test_update_answer_starts_new_round() {
        let feed = MockV3Aggregator::new(8, 100);
        assert_eq!(feed.round_id().await, 1);

        feed.update_answer(300_000_000_000).await;
        assert_eq!(feed.round_id().await, 2);
        assert_eq!(feed.latest_price().await.unwrap().price, 300_000_000_000);
    }

    #[tokio::test]
    async fn test_non_positive_answer_is_rejected() {
        let feed = MockV3Aggregator::new(8, 0);
        assert_eq!(
            feed.latest_price().await,
            Err(OracleError::InvalidPrice { answer: 0 })
        );

        feed.update_answer(-1).await;
        assert_eq!(
            feed.latest_price().await,
            Err(OracleError::InvalidPrice { answer: -1 })
        );
    }
}
