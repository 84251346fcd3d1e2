pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::cli::Session;
use crate::core::config::AppConfig;
use crate::store::disk::DiskStore;
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    Deploy { force: bool },
    Fund { from: Option<String>, amount: String },
    Withdraw { from: Option<String> },
    Status,
    Price,
}

pub async fn run_command(
    command: AppCommand,
    config_path: Option<&str>,
    network: Option<&str>,
) -> Result<()> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let network = network.unwrap_or(config.network.as_str()).to_string();
    info!(%network, "Using network");

    let store = DiskStore::open(&config.default_data_path()?)?;
    let session = Session::new(&config, &network, &store);

    let output = match command {
        AppCommand::Deploy { force } => cli::deploy::deploy(&session, force)?,
        AppCommand::Fund { from, amount } => {
            cli::fund::fund(&session, from.as_deref(), &amount).await?
        }
        AppCommand::Withdraw { from } => cli::withdraw::withdraw(&session, from.as_deref())?,
        AppCommand::Status => cli::status::status(&session).await?,
        AppCommand::Price => cli::price::price(&session).await?,
    };
    println!("{output}");
    Ok(())
}
