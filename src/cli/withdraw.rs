use super::Session;
use super::ui::{StyleType, style_text};
use crate::core::units::format_ether;
use anyhow::{Context, Result};

pub fn withdraw(session: &Session<'_>, from: Option<&str>) -> Result<String> {
    let caller = session.sender(from)?;
    let mut open = session.open_chain()?;

    let amount = open
        .chain
        .withdraw(caller)
        .with_context(|| format!("Withdrawal by {caller} failed"))?;
    session.commit(&open)?;

    let owner = open.chain.ledger().owner();
    Ok(format!(
        "Withdrew {} ETH to {}\nOwner balance: {} ETH",
        style_text(&format_ether(amount), StyleType::Value),
        owner,
        format_ether(open.chain.wallets().balance(&owner)),
    ))
}
