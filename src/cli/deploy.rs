use super::Session;
use super::ui::{StyleType, style_text};
use crate::core::ledger::FundingLedger;
use crate::core::units::format_usd;
use crate::providers::resolver::resolve_oracle;
use crate::store::Deployment;
use anyhow::{Result, bail};
use chrono::Utc;
use tracing::info;

/// Creates the ledger for the session's network. The deployer owns it.
pub fn deploy(session: &Session<'_>, force: bool) -> Result<String> {
    if !force && session.store.load(&session.network)?.is_some() {
        bail!(
            "Already deployed on network '{}'. Use --force to redeploy",
            session.network
        );
    }

    // A redeploy starts from fresh wallets too
    let oracle = resolve_oracle(session.config, &session.network)?;
    let ledger = FundingLedger::new(session.config.ledger_config()?, oracle);
    let deployment = Deployment {
        network: session.network.clone(),
        deployed_at: Utc::now(),
        ledger: ledger.snapshot(),
        wallets: session.config.genesis_wallets()?,
    };
    session.store.save(&deployment)?;
    info!(network = %session.network, "Ledger deployed");

    Ok(format!(
        "Deployed on {}\n  owner:       {}\n  price feed:  {}\n  minimum:     {}",
        style_text(&session.network, StyleType::Title),
        ledger.owner(),
        ledger.price_oracle(),
        style_text(&format_usd(ledger.minimum_usd()), StyleType::Value),
    ))
}
