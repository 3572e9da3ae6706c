pub mod cli;
pub mod core;
pub mod store;

use crate::cli::{report, shell};
use crate::core::Market;
use crate::core::config::AppConfig;
use anyhow::{Context, Result};
use std::io::{self, Write};
use tracing::{debug, info};

/// Commands that run against a freshly seeded market.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Shell,
    Stocks,
    Trades,
    Stock { symbol: String },
    DividendYield { symbol: String, price: f64 },
    PeRatio { symbol: String, price: f64 },
    Vwsp { symbol: String, minutes: u32 },
    Index,
}

/// Builds a market holding the configured stocks and trades.
///
/// Trades go through the regular recording workflow, so they adjust share
/// counts and are stamped with the current time.
pub fn load_market(config: &AppConfig) -> Result<Market> {
    let market = Market::new();
    for stock in &config.stocks {
        market
            .create_stock(stock.clone())
            .with_context(|| format!("Failed to load stock {}", stock.symbol))?;
    }
    for trade in &config.trades {
        market
            .record_trade(trade.clone())
            .with_context(|| format!("Failed to load {} trade on {}", trade.side, trade.symbol))?;
    }
    info!(
        stocks = config.stocks.len(),
        trades = config.trades.len(),
        "Loaded market data"
    );
    Ok(market)
}

pub fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("GBCE starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let market = load_market(&config)?;
    execute(command, &market, config.precision, &mut io::stdout())
}

/// Runs `command` against `market`, writing its output to `out`.
pub fn execute<W: Write>(
    command: AppCommand,
    market: &Market,
    precision: usize,
    out: &mut W,
) -> Result<()> {
    match command {
        AppCommand::Shell => {
            let stdin = io::stdin();
            shell::run(market, precision, stdin.lock(), out)?;
        }
        AppCommand::Stocks => writeln!(out, "{}", report::stocks_table(&market.list_stocks()))?,
        AppCommand::Trades => writeln!(out, "{}", report::trades_table(&market.list_trades()))?,
        AppCommand::Stock { symbol } => match market.get_stock(&symbol)? {
            Some(stock) => writeln!(out, "{}", report::stocks_table(&[stock]))?,
            None => writeln!(out, "Stock [{symbol}] is not defined.")?,
        },
        AppCommand::DividendYield { symbol, price } => {
            let value = market.dividend_yield(&symbol, price)?;
            writeln!(out, "{}", report::metric_line("Dividend Yield", value, precision))?;
        }
        AppCommand::PeRatio { symbol, price } => {
            let value = market.pe_ratio(&symbol, price)?;
            writeln!(out, "{}", report::metric_line("P/E Ratio", value, precision))?;
        }
        AppCommand::Vwsp { symbol, minutes } => {
            let value = market.volume_weighted_price(&symbol, minutes)?;
            writeln!(
                out,
                "{}",
                report::metric_line("Volume Weighted Stock Price", value, precision)
            )?;
        }
        AppCommand::Index => {
            let value = market.all_share_index()?;
            writeln!(out, "{}", report::metric_line("GBCE All Share Index", value, precision))?;
        }
    }
    Ok(())
}
