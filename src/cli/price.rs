use super::Session;
use super::ui::{StyleType, new_spinner, style_text};
use crate::core::price::PriceReading;
use crate::core::units::{WAD, format_usd};
use crate::providers::resolver::resolve_oracle;
use anyhow::{Context, Result};

/// USD value of one whole native unit at `reading`.
pub fn unit_price(reading: &PriceReading) -> Option<u128> {
    crate::core::conversion::convert_to_usd(WAD, reading.price, reading.decimals)
}

pub async fn price(session: &Session<'_>) -> Result<String> {
    let oracle = resolve_oracle(session.config, &session.network)?;

    let spinner = new_spinner("Querying price feed...");
    let result = oracle.latest_price().await;
    spinner.finish_and_clear();
    let reading = result.context("Price feed query failed")?;

    let updated = reading
        .updated_at
        .map_or("unknown".to_string(), |t| t.to_rfc3339());
    Ok(format!(
        "ETH/USD {} (feed {}, {} decimals, updated {})",
        style_text(
            &unit_price(&reading).map_or("N/A".to_string(), format_usd),
            StyleType::Value
        ),
        oracle.address(),
        reading.decimals,
        style_text(&updated, StyleType::Subtle),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::AppConfig;
    use crate::store::memory::MemoryStore;

    #[test]
    fn test_unit_price() {
        let reading = PriceReading::from_answer(200_000_000_000, 8, None).unwrap();
        assert_eq!(unit_price(&reading), Some(2000 * WAD));
    }

    #[tokio::test]
    async fn test_price_on_development_network() {
        console::set_colors_enabled(false);
        let config = AppConfig::default();
        let store = MemoryStore::new();
        let session = Session::new(&config, "localhost", &store);

        let output = price(&session).await.unwrap();
        assert!(output.starts_with("ETH/USD $2000.00"));
        assert!(output.contains("8 decimals"));
    }
}
