use crate::core::error::{MarketError, Result};
use crate::core::model::{Trade, is_present};
use crate::store::{Datastore, Filter, MemoryStore};
use tracing::error;

/// Append-only record of trades, grouped by stock symbol.
pub struct TradeLedger {
    store: Box<dyn Datastore<Trade>>,
}

impl TradeLedger {
    pub fn new() -> Self {
        Self::with_store(Box::new(MemoryStore::<Trade>::new()))
    }

    pub fn with_store(store: Box<dyn Datastore<Trade>>) -> Self {
        Self { store }
    }

    pub fn record(&self, trade: Trade) -> Result<()> {
        let symbol = trade.symbol.clone();
        self.store.store(trade).map_err(|e| {
            error!(error = %e, "Error occurred while saving trade on {symbol}");
            MarketError::from(e)
        })
    }

    /// Lists the trades on `symbol` that are at most `max_age_minutes` old.
    /// A trade exactly `max_age_minutes` old is included.
    pub fn list_aged(&self, symbol: &str, max_age_minutes: u32) -> Result<Vec<Trade>> {
        if !is_present(symbol) {
            return Err(MarketError::Validation(format!(
                "invalid stock symbol: [{symbol}]"
            )));
        }
        if max_age_minutes == 0 {
            return Err(MarketError::Validation(
                "trade age must be at least one minute".to_string(),
            ));
        }

        let filter = Filter::AgedTrades {
            symbol: symbol.to_string(),
            max_age_minutes,
        };
        self.store.filter(&filter).map_err(|e| {
            error!(
                error = %e,
                "Error occurred while filtering aged trades, stock: [{symbol}], max age in minutes: [{max_age_minutes}]"
            );
            MarketError::from(e)
        })
    }

    pub fn list_all(&self) -> Vec<Trade> {
        self.store.list()
    }

    pub fn count(&self) -> usize {
        self.store.count()
    }
}

impl Default for TradeLedger {
    fn default() -> Self {
        Self::new()
    }
}
