use gbce::core::config::AppConfig;
use gbce::core::{Market, MarketError, Stock, StockKind, Trade, TradeSide};
use gbce::{AppCommand, execute, load_market};
use tracing::info;

mod test_utils {
    use std::io::Write;

    pub fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write config file");
        file
    }

    pub fn run(command: gbce::AppCommand, market: &gbce::core::Market) -> String {
        let mut out = Vec::new();
        gbce::execute(command, market, 4, &mut out).expect("Command failed");
        String::from_utf8(out).expect("Output is not UTF-8")
    }
}

#[test_log::test]
fn test_example_market_end_to_end() {
    let config = AppConfig::example().unwrap();
    let market = load_market(&config).unwrap();

    let tea = market.get_stock("TEA").unwrap().unwrap();
    assert_eq!(tea.shares_count, 1050);
    assert_eq!(market.list_stocks().len(), 5);
    assert_eq!(market.list_trades().len(), 2);

    let vwsp = market.volume_weighted_price("TEA", 60).unwrap();
    info!(vwsp, "Computed volume weighted stock price");
    assert_eq!(vwsp, (25.0 * 100.0 + 15.0 * 50.0) / (100.0 + 50.0));

    assert_eq!(market.dividend_yield("POP", 2.0).unwrap(), 4.0);
    assert!((market.dividend_yield("GIN", 50.0).unwrap() - 0.04).abs() < 1e-12);
    assert!(matches!(
        market.pe_ratio("TEA", 10.0),
        Err(MarketError::BusinessRule(_))
    ));

    let index = market.all_share_index().unwrap();
    assert!((index - (25.0f64 * 15.0).sqrt()).abs() < 1e-9);
}

#[test_log::test]
fn test_trade_recording_properties() {
    let market = Market::new();
    market
        .create_stock(Stock::new("ALE", StockKind::Common, 300, 60.0, 23.0, 0.0))
        .unwrap();

    let trades = [
        (TradeSide::Buy, 50, 10.0),
        (TradeSide::Sell, 200, 11.0),
        (TradeSide::Sell, 151, 12.0),
        (TradeSide::Sell, 150, 9.5),
        (TradeSide::Buy, 1, 9.0),
    ];
    let mut expected_shares: u64 = 300;
    let mut expected_trades = 0;
    for (side, quantity, price) in trades {
        let before = market.get_stock("ALE").unwrap().unwrap().shares_count;
        let result = market.record_trade(Trade::new("ALE", side, quantity, price));
        match side {
            TradeSide::Sell if quantity > before => {
                assert!(matches!(result, Err(MarketError::BusinessRule(_))));
            }
            TradeSide::Sell => {
                result.unwrap();
                expected_shares -= quantity;
                expected_trades += 1;
            }
            TradeSide::Buy => {
                result.unwrap();
                expected_shares += quantity;
                expected_trades += 1;
            }
        }
        assert_eq!(
            market.get_stock("ALE").unwrap().unwrap().shares_count,
            expected_shares
        );
        assert_eq!(market.list_trades().len(), expected_trades);
    }
    assert_eq!(expected_shares, 1);
}

#[test_log::test]
fn test_run_command_with_config_file() {
    let config_file = test_utils::write_config(
        r#"
stocks:
  - symbol: "POP"
    kind: COMMON
    shares_count: 1000
    par_value: 100
    last_dividend: 8
    fixed_dividend: 0
trades:
  - symbol: "POP"
    side: BUY
    quantity: 10
    price: 4
precision: 2
"#,
    );
    let path = config_file.path().to_str().unwrap();

    for command in [
        AppCommand::Stocks,
        AppCommand::Trades,
        AppCommand::Index,
        AppCommand::DividendYield {
            symbol: "POP".to_string(),
            price: 2.0,
        },
    ] {
        let result = gbce::run_command(command, Some(path));
        assert!(result.is_ok(), "Command failed with: {:?}", result.err());
    }

    let failed = gbce::run_command(
        AppCommand::Vwsp {
            symbol: "ALE".to_string(),
            minutes: 15,
        },
        Some(path),
    );
    assert!(failed.is_err());
}

#[test]
fn test_execute_reports() {
    let market = load_market(&AppConfig::example().unwrap()).unwrap();

    let stocks = test_utils::run(AppCommand::Stocks, &market);
    for symbol in ["TEA", "POP", "ALE", "GIN", "JOE"] {
        assert!(stocks.contains(symbol));
    }

    let stock = test_utils::run(
        AppCommand::Stock {
            symbol: "GIN".to_string(),
        },
        &market,
    );
    assert!(stock.contains("PREFERRED"));

    let missing = test_utils::run(
        AppCommand::Stock {
            symbol: "XYZ".to_string(),
        },
        &market,
    );
    assert!(missing.contains("Stock [XYZ] is not defined."));

    let vwsp = test_utils::run(
        AppCommand::Vwsp {
            symbol: "TEA".to_string(),
            minutes: 15,
        },
        &market,
    );
    assert!(vwsp.contains("21.6667"));

    let pe = test_utils::run(
        AppCommand::PeRatio {
            symbol: "ALE".to_string(),
            price: 46.0,
        },
        &market,
    );
    assert!(pe.contains("2.0000"));

    let mut out = Vec::new();
    let err = execute(
        AppCommand::DividendYield {
            symbol: "TEA".to_string(),
            price: 0.0,
        },
        &market,
        4,
        &mut out,
    )
    .unwrap_err();
    assert!(err.to_string().contains("dividend yield"));
}

#[test]
fn test_invalid_seed_data_fails_to_load() {
    let config_file = test_utils::write_config(
        r#"
stocks:
  - symbol: "TEA"
    kind: COMMON
    shares_count: 10
    par_value: 100
    last_dividend: 0
    fixed_dividend: 0
trades:
  - symbol: "TEA"
    side: SELL
    quantity: 11
    price: 4
"#,
    );
    let config = AppConfig::load_from_path(config_file.path()).unwrap();
    let Err(err) = load_market(&config) else {
        panic!("oversold seed trade should be rejected");
    };
    assert!(err.to_string().contains("Failed to load SELL trade on TEA"));

    let duplicate = "stocks:\n  - {symbol: TEA, kind: COMMON, shares_count: 1, par_value: 1, last_dividend: 0, fixed_dividend: 0}\n  - {symbol: TEA, kind: PREFERRED, shares_count: 1, par_value: 1, last_dividend: 0, fixed_dividend: 0}\n";
    let config: AppConfig = serde_yaml::from_str(duplicate).unwrap();
    let Err(err) = load_market(&config) else {
        panic!("duplicate seed stock should be rejected");
    };
    assert!(err.to_string().contains("Failed to load stock TEA"));
}
