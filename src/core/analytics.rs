//! Provides the market calculations over stocks and trades.
//!
//! These are pure functions; [`crate::core::market::Market`] fetches the data
//! they need and maps missing data to errors.
use crate::core::error::{MarketError, Result};
use crate::core::model::{Stock, StockKind, Trade};
use tracing::error;

/// Income return of `stock` relative to `price`.
///
/// COMMON stocks use the last dividend, PREFERRED stocks the fixed dividend
/// applied to the par value. `price` must already be known to be positive.
pub fn dividend_yield(stock: &Stock, price: f64) -> f64 {
    match stock.kind {
        StockKind::Common => stock.last_dividend / price,
        StockKind::Preferred => stock.fixed_dividend * stock.par_value / price,
    }
}

/// Price divided by the last dividend. Fails whenever the division does not
/// produce a finite number, which includes a zero last dividend.
pub fn pe_ratio(stock: &Stock, price: f64) -> Result<f64> {
    let ratio = price / stock.last_dividend;
    if !ratio.is_finite() {
        error!(
            "Division by zero for P/E ratio of {} (last dividend {})",
            stock.symbol, stock.last_dividend
        );
        return Err(MarketError::BusinessRule(format!(
            "cannot compute P/E ratio for stock [{}]: price {price} / last dividend {}",
            stock.symbol, stock.last_dividend
        )));
    }
    Ok(ratio)
}

/// `Σ(price·quantity) / Σ(quantity)`, or `None` without trades.
pub fn volume_weighted_price(trades: &[Trade]) -> Option<f64> {
    if trades.is_empty() {
        return None;
    }
    let (numerator, denominator) = trades.iter().fold((0.0, 0.0), |(num, den), trade| {
        let quantity = trade.quantity as f64;
        (num + trade.price * quantity, den + quantity)
    });
    Some(numerator / denominator)
}

/// Geometric mean of `prices`, or `None` when there are none.
///
/// Computed as `exp(mean(ln p))` so the running product cannot overflow.
pub fn geometric_mean(prices: &[f64]) -> Option<f64> {
    if prices.is_empty() {
        return None;
    }
    let log_sum: f64 = prices.iter().map(|price| price.ln()).sum();
    Some((log_sum / prices.len() as f64).exp())
}
