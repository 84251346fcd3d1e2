use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fundme::cli::fund::DEFAULT_AMOUNT;
use fundme::cli::setup::setup;
use fundme::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Network to act on (defaults to the configured one)
    #[arg(short, long, global = true)]
    network: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for fundme::AppCommand {
    fn from(cmd: Commands) -> fundme::AppCommand {
        match cmd {
            Commands::Deploy { force } => fundme::AppCommand::Deploy { force },
            Commands::Fund { from, amount } => fundme::AppCommand::Fund { from, amount },
            Commands::Withdraw { from } => fundme::AppCommand::Withdraw { from },
            Commands::Status => fundme::AppCommand::Status,
            Commands::Price => fundme::AppCommand::Price,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Deploy the funding ledger on the network
    Deploy {
        /// Replace an existing deployment and reset wallets
        #[arg(long)]
        force: bool,
    },
    /// Send ether to the ledger
    Fund {
        /// Account index or address to fund from (defaults to the deployer)
        #[arg(long)]
        from: Option<String>,
        /// Amount in ether
        #[arg(long, default_value = DEFAULT_AMOUNT)]
        amount: String,
    },
    /// Withdraw the whole balance to the owner
    Withdraw {
        /// Account index or address calling withdraw (defaults to the deployer)
        #[arg(long)]
        from: Option<String>,
    },
    /// Display the ledger's funders and balance
    Status,
    /// Display the current ETH/USD price
    Price,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => {
            fundme::run_command(
                cmd.into(),
                cli.config_path.as_deref(),
                cli.network.as_deref(),
            )
            .await
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
