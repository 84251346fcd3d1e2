//! Picks the price feed implementation for a network.

use crate::core::config::AppConfig;
use crate::core::price::PriceOracle;
use crate::providers::chainlink::ChainlinkFeed;
use crate::providers::mock::MockV3Aggregator;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

/// Builds the oracle bound to ledgers deployed on `network`.
pub fn resolve_oracle(config: &AppConfig, network: &str) -> Result<Arc<dyn PriceOracle>> {
    if config.is_development(network) {
        info!(network, "Development network, using mock price feed");
        let feed = MockV3Aggregator::new(
            config.mock.decimals,
            i128::from(config.mock.initial_answer),
        );
        return Ok(Arc::new(feed));
    }

    // Live networks need both a feed address and an endpoint
    let network_config = config.network_config(network)?;
    let feed_address = network_config
        .eth_usd_price_feed
        .with_context(|| format!("Network '{network}' has no eth_usd_price_feed"))?;
    let rpc_url = network_config
        .rpc_url
        .as_deref()
        .with_context(|| format!("Network '{network}' has no rpc_url"))?;

    info!(network, feed = %feed_address, "Using live price feed");
    Ok(Arc::new(ChainlinkFeed::new(
        rpc_url,
        feed_address,
        config.max_price_age(),
    )))
}
