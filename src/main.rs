use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use gbce::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for gbce::AppCommand {
    fn from(cmd: Commands) -> gbce::AppCommand {
        match cmd {
            Commands::Shell => gbce::AppCommand::Shell,
            Commands::Stocks => gbce::AppCommand::Stocks,
            Commands::Trades => gbce::AppCommand::Trades,
            Commands::Stock { symbol } => gbce::AppCommand::Stock { symbol },
            Commands::DividendYield { symbol, price } => {
                gbce::AppCommand::DividendYield { symbol, price }
            }
            Commands::PeRatio { symbol, price } => gbce::AppCommand::PeRatio { symbol, price },
            Commands::Vwsp { symbol, minutes } => gbce::AppCommand::Vwsp { symbol, minutes },
            Commands::Index => gbce::AppCommand::Index,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Start the interactive menu
    Shell,
    /// List all stocks
    Stocks,
    /// List all trades
    Trades,
    /// Show a single stock
    Stock { symbol: String },
    /// Calculate the dividend yield of a stock at a price
    DividendYield { symbol: String, price: f64 },
    /// Calculate the P/E ratio of a stock at a price
    PeRatio { symbol: String, price: f64 },
    /// Calculate the volume weighted stock price of recent trades
    Vwsp {
        symbol: String,
        /// Maximum trade age in minutes
        #[arg(short, long, default_value_t = 15)]
        minutes: u32,
    },
    /// Calculate the GBCE all share index
    Index,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => gbce::cli::setup::setup(),
        Some(cmd) => gbce::run_command(cmd.into(), cli.config_path.as_deref()),
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
