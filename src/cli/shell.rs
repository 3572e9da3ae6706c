//! Interactive numbered menu over a [`Market`].
use super::{report, ui};
use crate::core::{Market, MarketError, Stock, StockKind, Trade, TradeSide};
use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

const MENU: &str = "\
1. Calculate dividend yield
2. Calculate P/E ratio
3. Record a trade
4. Calculate volume weighted stock price
5. Calculate GBCE all share index
----------------------------------------
6. Record a stock
7. List all stocks
8. List all trades
----------------------------------------
9. Print this menu
0. Exit";

const NEXT: &str = "Please choose what you want to do next: ";

#[derive(Error, Debug)]
enum ShellError {
    #[error("{0}")]
    Input(String),

    #[error(transparent)]
    Market(#[from] MarketError),

    #[error("input closed")]
    Closed,

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Runs the menu until `0` is entered or the input ends.
///
/// Bad input and failed operations are reported and the menu is shown again.
/// Only failures of the input or output streams end the shell with an error.
pub fn run<R: BufRead, W: Write>(
    market: &Market,
    precision: usize,
    input: R,
    output: W,
) -> Result<()> {
    let mut shell = Shell {
        market,
        precision,
        input,
        output,
    };
    shell.run_loop().context("Failed to read user input")
}

struct Shell<'a, R, W> {
    market: &'a Market,
    precision: usize,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<'_, R, W> {
    fn run_loop(&mut self) -> io::Result<()> {
        self.print_usage()?;
        loop {
            let Some(line) = self.read_line()? else {
                break;
            };
            let choice = line.trim();
            if choice == "0" {
                break;
            }

            let result = match choice.parse::<u8>() {
                Ok(1) => self.dividend_yield(),
                Ok(2) => self.pe_ratio(),
                Ok(3) => self.record_trade(),
                Ok(4) => self.volume_weighted_price(),
                Ok(5) => self.all_share_index(),
                Ok(6) => self.record_stock(),
                Ok(7) => self.list_stocks(),
                Ok(8) => self.list_trades(),
                _ => {
                    self.print_usage()?;
                    continue;
                }
            };

            match result {
                Ok(()) => write!(self.output, "{NEXT}")?,
                Err(ShellError::Closed) => break,
                Err(ShellError::Io(e)) => return Err(e),
                Err(e) => {
                    debug!(error = %e, "Menu action failed");
                    writeln!(self.output, "{}", ui::style_text(&e.to_string(), ui::StyleType::Error))?;
                    self.print_usage()?;
                }
            }
            self.output.flush()?;
        }
        writeln!(self.output)?;
        Ok(())
    }

    fn print_usage(&mut self) -> io::Result<()> {
        writeln!(
            self.output,
            "{}",
            ui::style_text("Welcome to the GBCE Super Simple Stock Market.", ui::StyleType::Title)
        )?;
        writeln!(self.output, "{MENU}")?;
        write!(self.output, "{NEXT}")?;
        self.output.flush()
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn prompt(&mut self, label: &str) -> Result<String, ShellError> {
        write!(self.output, "{label}: ")?;
        self.output.flush()?;
        let line = self.read_line()?.ok_or(ShellError::Closed)?;
        Ok(line.trim().to_string())
    }

    fn prompt_parsed<T: FromStr>(&mut self, label: &str) -> Result<T, ShellError> {
        let text = self.prompt(label)?;
        text.parse()
            .map_err(|_| ShellError::Input(format!("Invalid {} value.", label.to_lowercase())))
    }

    fn show_metric(&mut self, label: &str, value: f64) -> Result<(), ShellError> {
        writeln!(self.output, "{}", report::metric_line(label, value, self.precision))?;
        Ok(())
    }

    fn dividend_yield(&mut self) -> Result<(), ShellError> {
        let symbol = self.prompt("Stock symbol")?;
        let price: f64 = self.prompt_parsed("Price")?;
        let value = self.market.dividend_yield(&symbol, price)?;
        self.show_metric("Dividend Yield", value)
    }

    fn pe_ratio(&mut self) -> Result<(), ShellError> {
        let symbol = self.prompt("Stock symbol")?;
        let price: f64 = self.prompt_parsed("Price")?;
        let value = self.market.pe_ratio(&symbol, price)?;
        self.show_metric("P/E Ratio", value)
    }

    fn record_trade(&mut self) -> Result<(), ShellError> {
        let symbol = self.prompt("Stock symbol")?;
        let side: TradeSide = self
            .prompt("Side (use 'BUY' or 'SELL')")?
            .parse()
            .map_err(|_| ShellError::Input("Unknown trade side.".to_string()))?;
        let quantity: u64 = self.prompt_parsed("Quantity")?;
        let price: f64 = self.prompt_parsed("Price")?;

        let trade = self
            .market
            .record_trade(Trade::new(&symbol, side, quantity, price))?;
        writeln!(
            self.output,
            "Trade saved: {} {} {} @ {:.2}",
            trade.side, trade.quantity, trade.symbol, trade.price
        )?;
        Ok(())
    }

    fn volume_weighted_price(&mut self) -> Result<(), ShellError> {
        let symbol = self.prompt("Stock symbol")?;
        let minutes: u32 = self.prompt_parsed("Trades age (in minutes)")?;
        let value = self.market.volume_weighted_price(&symbol, minutes)?;
        self.show_metric("Volume Weighted Stock Price", value)
    }

    fn all_share_index(&mut self) -> Result<(), ShellError> {
        let value = self.market.all_share_index()?;
        self.show_metric("GBCE All Share Index", value)
    }

    fn record_stock(&mut self) -> Result<(), ShellError> {
        let symbol = self.prompt("Stock symbol")?;
        let kind: StockKind = self
            .prompt("Stock kind (use 'COMMON' or 'PREFERRED')")?
            .parse()
            .map_err(|_| ShellError::Input("Unknown stock kind.".to_string()))?;
        let shares_count: u64 = self.prompt_parsed("Shares count")?;
        let last_dividend: f64 = self.prompt_parsed("Last dividend")?;
        let fixed_dividend: f64 = self.prompt_parsed("Fixed dividend")?;
        let par_value: f64 = self.prompt_parsed("Par value")?;

        self.market.create_stock(Stock::new(
            &symbol,
            kind,
            shares_count,
            par_value,
            last_dividend,
            fixed_dividend,
        ))?;
        writeln!(self.output, "Stock saved: {symbol}")?;
        Ok(())
    }

    fn list_stocks(&mut self) -> Result<(), ShellError> {
        let stocks = self.market.list_stocks();
        writeln!(self.output, "{}", report::stocks_table(&stocks))?;
        Ok(())
    }

    fn list_trades(&mut self) -> Result<(), ShellError> {
        let trades = self.market.list_trades();
        writeln!(self.output, "{}", report::trades_table(&trades))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn market() -> Market {
        let market = Market::new();
        market
            .create_stock(Stock::new("TEA", StockKind::Common, 1000, 100.0, 0.0, 0.0))
            .unwrap();
        market
            .create_stock(Stock::new("POP", StockKind::Common, 1000, 100.0, 8.0, 0.0))
            .unwrap();
        market
    }

    fn run_script(market: &Market, script: &str) -> String {
        let mut output = Vec::new();
        run(market, 4, Cursor::new(script.to_string()), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test_log::test]
    fn test_dividend_yield_from_menu() {
        let market = market();
        let output = run_script(&market, "1\nPOP\n2\n0\n");
        assert!(output.contains("Dividend Yield"));
        assert!(output.contains("4.0000"));
    }

    #[test_log::test]
    fn test_record_trade_then_vwsp() {
        let market = market();
        let output = run_script(&market, "3\nTEA\nbuy\n100\n25\n3\nTEA\nSELL\n50\n15\n4\nTEA\n60\n0\n");
        assert!(output.contains("Trade saved: BUY 100 TEA @ 25.00"));
        assert!(output.contains("21.6667"));
        assert_eq!(market.list_trades().len(), 2);
        assert_eq!(market.get_stock("TEA").unwrap().unwrap().shares_count, 1050);
    }

    #[test]
    fn test_failures_show_menu_and_continue() {
        let market = market();
        let output = run_script(&market, "2\nTEA\n25\n1\nPOP\nabc\nfoo\n5\n0\n");
        assert!(output.contains("cannot compute P/E ratio"));
        assert!(output.contains("Invalid price value."));
        assert!(output.contains("unable to find any trades information"));
        // initial menu, P/E failure, bad price, bad choice, missing trades
        assert_eq!(output.matches("0. Exit").count(), 5);
    }

    #[test]
    fn test_record_and_list_stock() {
        let market = market();
        let output = run_script(&market, "6\nGIN\nPREFERRED\n1000\n8\n0.02\n100\n7\n0\n");
        assert!(output.contains("Stock saved: GIN"));
        let gin = market.get_stock("GIN").unwrap().unwrap();
        assert_eq!(gin.kind, StockKind::Preferred);
        assert_eq!(gin.par_value, 100.0);
        assert_eq!(gin.fixed_dividend, 0.02);
        assert!(output.contains("GIN"));
    }

    #[test]
    fn test_duplicate_stock_is_reported() {
        let market = market();
        let output = run_script(&market, "6\nTEA\nCOMMON\n10\n0\n0\n1\n0\n");
        assert!(output.contains("Stock [TEA] already exists"));
        assert_eq!(market.list_stocks().len(), 2);
    }

    #[test]
    fn test_end_of_input_exits_cleanly() {
        let market = market();
        let output = run_script(&market, "3\nTEA\nBUY\n");
        assert!(output.contains("Quantity: "));
        assert!(market.list_trades().is_empty());
    }

    struct BrokenInput;

    impl io::Read for BrokenInput {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("stream failure"))
        }
    }

    #[test]
    fn test_stream_failure_ends_shell() {
        let market = market();
        let result = run(&market, 4, io::BufReader::new(BrokenInput), Vec::new());
        assert!(result.is_err());
    }
}
