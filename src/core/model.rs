//! Stocks, trades and the enums describing them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StockKind {
    Common,
    Preferred,
}

impl Display for StockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                StockKind::Common => "COMMON",
                StockKind::Preferred => "PREFERRED",
            }
        )
    }
}

impl FromStr for StockKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "COMMON" => Ok(StockKind::Common),
            "PREFERRED" => Ok(StockKind::Preferred),
            _ => Err(anyhow::anyhow!("Unknown stock kind: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl Display for TradeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TradeSide::Buy => "BUY",
                TradeSide::Sell => "SELL",
            }
        )
    }
}

impl FromStr for TradeSide {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BUY" => Ok(TradeSide::Buy),
            "SELL" => Ok(TradeSide::Sell),
            _ => Err(anyhow::anyhow!("Unknown trade side: {}", s)),
        }
    }
}

/// A tradable stock, identified by its symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    pub symbol: String,
    pub kind: StockKind,
    pub shares_count: u64,
    pub par_value: f64,
    pub last_dividend: f64,
    pub fixed_dividend: f64,
}

impl Stock {
    pub fn new(
        symbol: &str,
        kind: StockKind,
        shares_count: u64,
        par_value: f64,
        last_dividend: f64,
        fixed_dividend: f64,
    ) -> Self {
        Self {
            symbol: symbol.to_string(),
            kind,
            shares_count,
            par_value,
            last_dividend,
            fixed_dividend,
        }
    }
}

/// A single trade executed against a stock.
///
/// `timestamp` is `None` for a proposed trade. The trade-recording workflow
/// always overwrites it with the time the trade was accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub symbol: String,
    pub side: TradeSide,
    pub quantity: u64,
    pub price: f64,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Trade {
    /// Creates a proposed trade without a timestamp.
    pub fn new(symbol: &str, side: TradeSide, quantity: u64, price: f64) -> Self {
        Self {
            symbol: symbol.to_string(),
            side,
            quantity,
            price,
            timestamp: None,
        }
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Returns true when the value holds at least one non-whitespace character.
pub fn is_present(value: &str) -> bool {
    !value.trim().is_empty()
}
