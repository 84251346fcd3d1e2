use super::Session;
use super::price::unit_price;
use super::ui::{self, StyleType, style_text};
use crate::core::conversion::convert_to_usd;
use crate::core::ledger::FundingLedger;
use crate::core::price::PriceReading;
use crate::core::units::{format_ether, format_usd};
use anyhow::Result;
use comfy_table::Cell;
use tracing::warn;

/// Renders the ledger: header facts plus one row per funder in funding order.
pub fn render_ledger(ledger: &FundingLedger, reading: Option<&PriceReading>) -> String {
    let usd = |wei| reading.and_then(|r| convert_to_usd(wei, r.price, r.decimals));

    let mut output = format!(
        "{}\n\n  owner:       {}\n  price feed:  {}\n  price:       {}\n  minimum:     {}\n  balance:     {} ETH\n",
        style_text("Ledger", StyleType::Title),
        ledger.owner(),
        ledger.price_oracle(),
        reading
            .and_then(unit_price)
            .map_or(style_text("N/A", StyleType::Error), format_usd),
        format_usd(ledger.minimum_usd()),
        format_ether(ledger.balance()),
    );

    if ledger.funder_count() == 0 {
        output.push_str(&format!("\n{}", style_text("No funders", StyleType::Subtle)));
        return output;
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("#"),
        ui::header_cell("Funder"),
        ui::header_cell("Contribution (ETH)"),
        ui::header_cell("Value (USD)"),
    ]);
    for (index, funder) in ledger.funders().iter().enumerate() {
        let amount = ledger.contribution(funder);
        table.add_row(vec![
            Cell::new(index),
            Cell::new(funder),
            ui::amount_cell(format_ether(amount)),
            ui::format_optional_cell(usd(amount), format_usd),
        ]);
    }
    output.push('\n');
    output.push_str(&table.to_string());
    output.push_str(&format!(
        "\n\n{} {}",
        style_text("Total value:", StyleType::Label),
        usd(ledger.balance()).map_or("N/A".to_string(), format_usd)
    ));
    output
}

pub async fn status(session: &Session<'_>) -> Result<String> {
    let open = session.open_chain()?;
    let ledger = open.chain.ledger();

    let reading = match ledger.oracle().latest_price().await {
        Ok(reading) => Some(reading),
        Err(e) => {
            warn!(error = %e, "Price unavailable, showing native amounts only");
            None
        }
    };
    Ok(render_ledger(ledger, reading.as_ref()))
}
