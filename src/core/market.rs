//! The market: one catalog, one ledger, and the operations offered to front ends.
use crate::core::analytics;
use crate::core::catalog::StockCatalog;
use crate::core::error::{MarketError, Result};
use crate::core::ledger::TradeLedger;
use crate::core::model::{Stock, Trade, TradeSide, is_present};
use crate::store::Datastore;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

/// Owns the stock catalog and trade ledger.
///
/// Trades on the same symbol are recorded one at a time; trades on different
/// symbols do not block each other.
pub struct Market {
    catalog: StockCatalog,
    ledger: TradeLedger,
    symbol_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl Market {
    pub fn new() -> Self {
        Self::with_parts(StockCatalog::new(), TradeLedger::new())
    }

    pub fn with_stores(
        stocks: Box<dyn Datastore<Stock>>,
        trades: Box<dyn Datastore<Trade>>,
    ) -> Self {
        Self::with_parts(
            StockCatalog::with_store(stocks),
            TradeLedger::with_store(trades),
        )
    }

    fn with_parts(catalog: StockCatalog, ledger: TradeLedger) -> Self {
        Self {
            catalog,
            ledger,
            symbol_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn create_stock(&self, stock: Stock) -> Result<()> {
        self.catalog.create(stock)
    }

    pub fn get_stock(&self, symbol: &str) -> Result<Option<Stock>> {
        self.catalog.read(symbol)
    }

    pub fn list_stocks(&self) -> Vec<Stock> {
        self.catalog.list_all()
    }

    pub fn list_trades(&self) -> Vec<Trade> {
        self.ledger.list_all()
    }

    /// Records a proposed trade and returns it as stored.
    ///
    /// The referenced stock's share count is adjusted (BUY adds, SELL
    /// subtracts) and persisted before the trade is stamped with the current
    /// time and appended to the ledger. Any caller-supplied timestamp is
    /// discarded. A failure at any step leaves the ledger untouched.
    pub fn record_trade(&self, mut trade: Trade) -> Result<Trade> {
        validate_trade(&trade)?;

        let lock = self.symbol_lock(&trade.symbol)?;
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut stock = self.require_stock(&trade.symbol)?;
        stock.shares_count = match trade.side {
            TradeSide::Buy => stock.shares_count.checked_add(trade.quantity).ok_or_else(|| {
                MarketError::BusinessRule(format!(
                    "buying {} shares would overflow the share count of stock [{}]",
                    trade.quantity, trade.symbol
                ))
            })?,
            TradeSide::Sell => stock.shares_count.checked_sub(trade.quantity).ok_or_else(|| {
                MarketError::BusinessRule(format!(
                    "trade quantity {} exceeds the {} available shares of stock [{}]",
                    trade.quantity, stock.shares_count, trade.symbol
                ))
            })?,
        };

        if !self.catalog.update(&stock)? {
            return Err(MarketError::InternalConsistency(format!(
                "stock [{}] disappeared while recording a trade",
                trade.symbol
            )));
        }

        trade.timestamp = Some(Utc::now());
        self.ledger.record(trade.clone())?;
        info!(
            symbol = %trade.symbol,
            side = %trade.side,
            quantity = trade.quantity,
            price = trade.price,
            shares_count = stock.shares_count,
            "Recorded trade"
        );
        Ok(trade)
    }

    pub fn dividend_yield(&self, symbol: &str, price: f64) -> Result<f64> {
        if price.is_nan() || price <= 0.0 {
            return Err(MarketError::Validation(format!(
                "cannot compute dividend yield for price [{price}]"
            )));
        }
        let stock = self.require_stock(symbol)?;
        Ok(analytics::dividend_yield(&stock, price))
    }

    pub fn pe_ratio(&self, symbol: &str, price: f64) -> Result<f64> {
        let stock = self.require_stock(symbol)?;
        analytics::pe_ratio(&stock, price)
    }

    /// Volume weighted price of the trades on `symbol` from the last
    /// `max_age_minutes` minutes.
    pub fn volume_weighted_price(&self, symbol: &str, max_age_minutes: u32) -> Result<f64> {
        if !is_present(symbol) {
            return Err(MarketError::Validation(format!(
                "invalid stock symbol: [{symbol}]"
            )));
        }
        let trades = self.ledger.list_aged(symbol, max_age_minutes)?;
        analytics::volume_weighted_price(&trades).ok_or_else(|| {
            let message = format!(
                "no matching aged trades have been found for stock [{symbol}], age in minutes: [{max_age_minutes}]"
            );
            warn!("{message}");
            MarketError::NotFound(message)
        })
    }

    /// Geometric mean of the price of every recorded trade.
    pub fn all_share_index(&self) -> Result<f64> {
        let prices: Vec<f64> = self.ledger.list_all().iter().map(|t| t.price).collect();
        debug!("Computing all share index over {} trades", prices.len());
        analytics::geometric_mean(&prices).ok_or_else(|| {
            warn!("Unable to find any trades information");
            MarketError::NotFound("unable to find any trades information".to_string())
        })
    }

    fn require_stock(&self, symbol: &str) -> Result<Stock> {
        self.catalog.read(symbol)?.ok_or_else(|| {
            MarketError::NotFound(format!("cannot match stock for symbol: [{symbol}]"))
        })
    }

    /// Lock guarding trades on `symbol`. Entries are only created for
    /// symbols in the catalog, so the map never outgrows it.
    fn symbol_lock(&self, symbol: &str) -> Result<Arc<Mutex<()>>> {
        let mut locks = self
            .symbol_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(lock) = locks.get(symbol) {
            return Ok(Arc::clone(lock));
        }
        self.require_stock(symbol)?;
        Ok(Arc::clone(locks.entry(symbol.to_string()).or_default()))
    }
}

impl Default for Market {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_trade(trade: &Trade) -> Result<()> {
    if !is_present(&trade.symbol) {
        return Err(MarketError::Validation(
            "trade does not reference a stock".to_string(),
        ));
    }
    if !trade.price.is_finite() || trade.price <= 0.0 {
        return Err(MarketError::Validation(format!(
            "invalid price specified for a trade: [{}]",
            trade.price
        )));
    }
    if trade.quantity == 0 {
        return Err(MarketError::Validation(
            "invalid quantity specified for a trade: [0]".to_string(),
        ));
    }
    Ok(())
}
