use super::Session;
use super::ui::{StyleType, new_spinner, style_text};
use crate::core::units::{format_ether, format_usd, parse_ether};
use anyhow::{Context, Result};

/// Amount the funding script sends when none is given.
pub const DEFAULT_AMOUNT: &str = "0.01";

/// Sends `amount` ether from `from` (default: the deployer) to the ledger.
pub async fn fund(session: &Session<'_>, from: Option<&str>, amount: &str) -> Result<String> {
    let sender = session.sender(from)?;
    let wei = parse_ether(amount).with_context(|| format!("Invalid amount '{amount}'"))?;
    let mut open = session.open_chain()?;

    let spinner = new_spinner("Funding...");
    let result = open.chain.fund(sender, wei).await;
    spinner.finish_and_clear();
    let usd_value = result.with_context(|| format!("Funding from {sender} failed"))?;

    session.commit(&open)?;
    Ok(format!(
        "Funded {} ETH ({}) from {}\nLedger balance: {} ETH",
        format_ether(wei),
        style_text(&format_usd(usd_value), StyleType::Value),
        sender,
        format_ether(open.chain.ledger().balance()),
    ))
}
