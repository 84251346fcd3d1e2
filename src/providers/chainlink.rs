//! Live price feed read from an on-chain aggregator over Ethereum JSON-RPC.

use crate::core::address::Address;
use crate::core::error::OracleError;
use crate::core::price::{PriceOracle, PriceReading};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, error};

/// `decimals()`
const DECIMALS_SELECTOR: &str = "0x313ce567";
/// `latestRoundData()`
const LATEST_ROUND_DATA_SELECTOR: &str = "0xfeaf968c";

const WORD: usize = 32;

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<String>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

pub struct ChainlinkFeed {
    rpc_url: String,
    address: Address,
    max_age: Option<Duration>,
    client: reqwest::Client,
    decimals: OnceCell<u8>,
}

impl ChainlinkFeed {
    pub fn new(rpc_url: &str, address: Address, max_age: Option<Duration>) -> Self {
        Self {
            rpc_url: rpc_url.to_string(),
            address,
            max_age,
            client: reqwest::Client::new(),
            decimals: OnceCell::new(),
        }
    }

    async fn eth_call(&self, selector: &str) -> Result<Vec<u8>, OracleError> {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "eth_call",
            "params": [{ "to": self.address.to_string(), "data": selector }, "latest"],
        });
        debug!(url = %self.rpc_url, feed = %self.address, selector, "Calling price feed");

        let response: RpcResponse = self
            .client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| OracleError::Unavailable(format!("request failed: {e}")))?
            .json()
            .await
            .map_err(|e| OracleError::Unavailable(format!("malformed RPC response: {e}")))?;

        if let Some(err) = response.error {
            error!(code = err.code, message = %err.message, "Price feed call reverted");
            return Err(OracleError::Unavailable(format!(
                "RPC error {}: {}",
                err.code, err.message
            )));
        }
        let result = response
            .result
            .ok_or_else(|| OracleError::Unavailable("RPC response has no result".to_string()))?;
        // Raw ABI-encoded return data
        let digits = result.strip_prefix("0x").unwrap_or(&result);
        hex::decode(digits)
            .map_err(|e| OracleError::Unavailable(format!("invalid hex in call result: {e}")))
    }

    async fn decimals(&self) -> Result<u8, OracleError> {
        self.decimals
            // Fixed per aggregator, so only asked once
            .get_or_try_init(|| async {
                let data = self.eth_call(DECIMALS_SELECTOR).await?;
                let value = word(&data, 0).and_then(word_to_u64).ok_or_else(|| {
                    OracleError::Unavailable("could not decode decimals()".to_string())
                })?;
                u8::try_from(value)
                    .map_err(|_| OracleError::Unavailable(format!("decimals out of range: {value}")))
            })
            .await
            .copied()
    }
}

fn word(data: &[u8], index: usize) -> Option<&[u8]> {
    data.get(index * WORD..(index + 1) * WORD)
}

fn word_to_u64(word: &[u8]) -> Option<u64> {
    // uint256 that must fit in u64
    let (high, low) = word.split_at(WORD - 8);
    if high.iter().any(|b| *b != 0) {
        return None;
    }
    Some(u64::from_be_bytes(low.try_into().ok()?))
}

fn word_to_i128(word: &[u8]) -> Option<i128> {
    // int256 that must fit in i128; the upper bytes are sign extension
    let (high, low) = word.split_at(WORD - 16);
    let value = i128::from_be_bytes(low.try_into().ok()?);
    let sign_fill = if value < 0 { 0xff } else { 0x00 };
    high.iter().all(|b| *b == sign_fill).then_some(value)
}

#[async_trait]
impl PriceOracle for ChainlinkFeed {
    fn address(&self) -> Address {
        self.address
    }

    async fn latest_price(&self) -> Result<PriceReading, OracleError> {
        let decimals = self.decimals().await?;
        let data = self.eth_call(LATEST_ROUND_DATA_SELECTOR).await?;

        // (roundId, answer, startedAt, updatedAt, answeredInRound)
        let answer = word(&data, 1)
            .and_then(word_to_i128)
            .ok_or_else(|| OracleError::Unavailable("could not decode answer".to_string()))?;
        let updated_at = word(&data, 3)
            .and_then(word_to_u64)
            .and_then(|secs| i64::try_from(secs).ok())
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
            .ok_or_else(|| OracleError::Unavailable("could not decode updatedAt".to_string()))?;
        debug!(answer, decimals, %updated_at, "Price feed answered");

        let reading = PriceReading::from_answer(answer, decimals, Some(updated_at))?;
        if let Some(max_age) = self.max_age {
            reading.ensure_fresh(max_age, Utc::now())?;
        }
        Ok(reading)
    }
}
