//! Core business logic: the stock catalog, trade ledger and market analytics

pub mod analytics;
pub mod catalog;
pub mod config;
pub mod error;
pub mod ledger;
pub mod log;
pub mod market;
pub mod model;

// Re-export main types for cleaner imports
pub use error::{MarketError, StoreError};
pub use market::Market;
pub use model::{Stock, StockKind, Trade, TradeSide};
