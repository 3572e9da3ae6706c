use super::ui;
use crate::core::{Stock, Trade};
use comfy_table::Cell;

pub fn stocks_table(stocks: &[Stock]) -> String {
    if stocks.is_empty() {
        return ui::style_text("No stocks defined.", ui::StyleType::Subtle);
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Symbol"),
        ui::header_cell("Kind"),
        ui::header_cell("Shares"),
        ui::header_cell("Par Value"),
        ui::header_cell("Last Dividend"),
        ui::header_cell("Fixed Dividend"),
    ]);

    for stock in stocks {
        table.add_row(vec![
            Cell::new(&stock.symbol),
            Cell::new(stock.kind.to_string()),
            ui::number_cell(stock.shares_count.to_string()),
            ui::number_cell(format!("{:.2}", stock.par_value)),
            ui::number_cell(format!("{:.2}", stock.last_dividend)),
            ui::number_cell(format!("{:.2}%", stock.fixed_dividend * 100.0)),
        ]);
    }
    table.to_string()
}

pub fn trades_table(trades: &[Trade]) -> String {
    if trades.is_empty() {
        return ui::style_text("No trades recorded.", ui::StyleType::Subtle);
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Time (UTC)"),
        ui::header_cell("Symbol"),
        ui::header_cell("Side"),
        ui::header_cell("Quantity"),
        ui::header_cell("Price"),
    ]);

    for trade in trades {
        let time = trade
            .timestamp
            .map_or("N/A".to_string(), |ts| ts.format("%Y-%m-%d %H:%M:%S").to_string());
        table.add_row(vec![
            Cell::new(time),
            Cell::new(&trade.symbol),
            ui::side_cell(trade.side),
            ui::number_cell(trade.quantity.to_string()),
            ui::number_cell(format!("{:.2}", trade.price)),
        ]);
    }
    table.to_string()
}

/// Formats a computed value as `Label: value` with `precision` decimals.
pub fn metric_line(label: &str, value: f64, precision: usize) -> String {
    format!(
        "{}: {}",
        ui::style_text(label, ui::StyleType::Label),
        ui::style_text(&format!("{value:.precision$}"), ui::StyleType::Value)
    )
}
