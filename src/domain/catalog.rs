//! Preset stocks offered by the dashboard selector.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockChoice {
    pub label: &'static str,
    pub ticker: &'static str,
}

pub const STOCKS: &[StockChoice] = &[
    StockChoice { label: "Apple (AAPL)", ticker: "AAPL" },
    StockChoice { label: "Tesla (TSLA)", ticker: "TSLA" },
    StockChoice { label: "Amazon (AMZN)", ticker: "AMZN" },
    StockChoice { label: "Microsoft (MSFT)", ticker: "MSFT" },
    StockChoice { label: "Google (GOOGL)", ticker: "GOOGL" },
    StockChoice { label: "NVIDIA (NVDA)", ticker: "NVDA" },
    StockChoice { label: "Meta (META)", ticker: "META" },
    StockChoice { label: "Netflix (NFLX)", ticker: "NFLX" },
];

pub fn default_ticker() -> &'static str {
    STOCKS[0].ticker
}

/// Looks a ticker up case-insensitively.
pub fn find(ticker: &str) -> Option<&'static StockChoice> {
    STOCKS.iter().find(|s| s.ticker.eq_ignore_ascii_case(ticker.trim()))
}
