pub mod memory;

use crate::core::error::StoreError;
use crate::core::model::{Stock, Trade, is_present};
use chrono::{DateTime, Duration, Utc};

pub use memory::MemoryStore;

/// Query passed to [`Datastore::filter`].
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Exact match on a stock symbol.
    Symbol(String),
    /// Trades on a symbol that are at most `max_age_minutes` old.
    AgedTrades {
        symbol: String,
        max_age_minutes: u32,
    },
}

impl Filter {
    pub fn symbol(&self) -> &str {
        match self {
            Filter::Symbol(symbol) => symbol,
            Filter::AgedTrades { symbol, .. } => symbol,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Filter::Symbol(_) => "Symbol",
            Filter::AgedTrades { .. } => "AgedTrades",
        }
    }
}

/// Per-kind policy plugged into a [`MemoryStore`].
pub trait Record: Clone + Send + Sync + 'static {
    const KIND: &'static str;

    /// At most one record may exist per key.
    const UNIQUE: bool;

    fn key(&self) -> &str;

    fn check_integrity(&self) -> Result<(), StoreError>;

    /// Rejects filters this kind does not understand or that lack search keys.
    fn check_filter(filter: &Filter) -> Result<(), StoreError>;

    fn matches(&self, filter: &Filter, now: DateTime<Utc>) -> bool;

    /// Whether stored records of this kind may be updated at all.
    fn check_update() -> Result<(), StoreError> {
        Err(StoreError::Unsupported(Self::KIND))
    }

    /// Copies the mutable fields of `update` onto `self`.
    fn apply_update(&mut self, _update: &Self) -> Result<(), StoreError> {
        Err(StoreError::Unsupported(Self::KIND))
    }
}

/// Keyed or grouped in-memory collection.
pub trait Datastore<T>: Send + Sync {
    /// Stores a new record.
    fn store(&self, record: T) -> Result<(), StoreError>;

    /// Applies `record` to the stored record sharing its key. Returns whether
    /// a match was found.
    fn update(&self, record: &T) -> Result<bool, StoreError>;

    /// Returns copies of the records matching `filter`.
    fn filter(&self, filter: &Filter) -> Result<Vec<T>, StoreError>;

    /// Returns copies of every record.
    fn list(&self) -> Vec<T>;

    fn count(&self) -> usize;
}

fn unknown_filter<T: Record>(filter: &Filter) -> StoreError {
    StoreError::InvalidFilter(format!(
        "unknown filter [{}] for the {} store",
        filter.name(),
        T::KIND
    ))
}

impl Record for Stock {
    const KIND: &'static str = "Stock";
    const UNIQUE: bool = true;

    fn key(&self) -> &str {
        &self.symbol
    }

    fn check_integrity(&self) -> Result<(), StoreError> {
        if !is_present(&self.symbol) {
            return Err(StoreError::Integrity {
                kind: Self::KIND,
                reason: "missing stock symbol (required)".to_string(),
            });
        }
        Ok(())
    }

    fn check_filter(filter: &Filter) -> Result<(), StoreError> {
        match filter {
            Filter::Symbol(symbol) if is_present(symbol) => Ok(()),
            Filter::Symbol(_) => Err(StoreError::InvalidFilter(
                "missing search key".to_string(),
            )),
            other => Err(unknown_filter::<Self>(other)),
        }
    }

    fn matches(&self, filter: &Filter, _now: DateTime<Utc>) -> bool {
        self.symbol == filter.symbol()
    }

    fn check_update() -> Result<(), StoreError> {
        Ok(())
    }

    fn apply_update(&mut self, update: &Self) -> Result<(), StoreError> {
        self.shares_count = update.shares_count;
        self.par_value = update.par_value;
        self.last_dividend = update.last_dividend;
        self.fixed_dividend = update.fixed_dividend;
        Ok(())
    }
}

impl Record for Trade {
    const KIND: &'static str = "Trade";
    const UNIQUE: bool = false;

    fn key(&self) -> &str {
        &self.symbol
    }

    fn check_integrity(&self) -> Result<(), StoreError> {
        if self.timestamp.is_none() {
            return Err(StoreError::Integrity {
                kind: Self::KIND,
                reason: "missing timestamp information (required)".to_string(),
            });
        }
        if !is_present(&self.symbol) {
            return Err(StoreError::Integrity {
                kind: Self::KIND,
                reason: "missing stock symbol information (required)".to_string(),
            });
        }
        Ok(())
    }

    fn check_filter(filter: &Filter) -> Result<(), StoreError> {
        match filter {
            Filter::AgedTrades {
                symbol,
                max_age_minutes,
            } if is_present(symbol) && *max_age_minutes > 0 => Ok(()),
            Filter::AgedTrades { .. } => Err(StoreError::InvalidFilter(
                "missing search keys information".to_string(),
            )),
            other => Err(unknown_filter::<Self>(other)),
        }
    }

    fn matches(&self, filter: &Filter, now: DateTime<Utc>) -> bool {
        let Filter::AgedTrades {
            symbol,
            max_age_minutes,
        } = filter
        else {
            return false;
        };
        if self.symbol != *symbol {
            return false;
        }
        let window = Duration::minutes(i64::from(*max_age_minutes));
        match (self.timestamp, now.checked_sub_signed(window)) {
            (Some(timestamp), Some(cutoff)) => timestamp >= cutoff,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }
}
