use crate::core::error::{MarketError, Result, StoreError};
use crate::core::model::{Stock, is_present};
use crate::store::{Datastore, Filter, MemoryStore};
use tracing::{debug, error};

/// Holds one [`Stock`] per symbol.
pub struct StockCatalog {
    store: Box<dyn Datastore<Stock>>,
}

impl StockCatalog {
    pub fn new() -> Self {
        Self::with_store(Box::new(MemoryStore::<Stock>::new()))
    }

    pub fn with_store(store: Box<dyn Datastore<Stock>>) -> Self {
        Self { store }
    }

    /// Validates and stores a new stock.
    pub fn create(&self, stock: Stock) -> Result<()> {
        validate_new_stock(&stock)?;

        let symbol = stock.symbol.clone();
        match self.store.store(stock) {
            Ok(()) => {
                debug!("Created stock {symbol}");
                Ok(())
            }
            Err(source @ StoreError::DuplicateKey { .. }) => {
                Err(MarketError::DuplicateStock { symbol, source })
            }
            Err(e) => {
                error!(error = %e, "Error occurred while saving stock {symbol}");
                Err(e.into())
            }
        }
    }

    /// Reads the stock for `symbol`, or `None` if it is not defined.
    pub fn read(&self, symbol: &str) -> Result<Option<Stock>> {
        if !is_present(symbol) {
            return Err(MarketError::Validation(format!(
                "invalid stock symbol: [{symbol}]"
            )));
        }

        let mut matches = self
            .store
            .filter(&Filter::Symbol(symbol.to_string()))
            .inspect_err(|e| error!(error = %e, "Error occurred while reading stock {symbol}"))?;

        if matches.len() > 1 {
            let message = format!("multiple matches found for stock symbol [{symbol}]");
            error!("{message}");
            return Err(MarketError::InternalConsistency(message));
        }
        Ok(matches.pop())
    }

    /// Replaces the mutable fields of the stored stock with those of `stock`.
    pub fn update(&self, stock: &Stock) -> Result<bool> {
        self.store.update(stock).map_err(|e| {
            error!(error = %e, "Error occurred while updating stock {}", stock.symbol);
            MarketError::from(e)
        })
    }

    pub fn list_all(&self) -> Vec<Stock> {
        self.store.list()
    }

    pub fn count(&self) -> usize {
        self.store.count()
    }
}

impl Default for StockCatalog {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_new_stock(stock: &Stock) -> Result<()> {
    if !is_present(&stock.symbol) {
        return Err(MarketError::Validation(
            "no stock symbol information".to_string(),
        ));
    }
    if stock.shares_count == 0 {
        return Err(MarketError::Validation(format!(
            "stock [{}] must have a positive shares count",
            stock.symbol
        )));
    }
    for (field, value) in [
        ("par value", stock.par_value),
        ("last dividend", stock.last_dividend),
        ("fixed dividend", stock.fixed_dividend),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(MarketError::Validation(format!(
                "invalid {field} [{value}] for stock [{}]",
                stock.symbol
            )));
        }
    }
    Ok(())
}
