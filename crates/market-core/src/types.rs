use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// OHLCV bar data, chronological oldest to newest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Listing exchange for a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Exchange {
    Nse,
    Bse,
}

impl Exchange {
    /// Suffix used by the chart/quote APIs (Yahoo convention).
    pub fn api_suffix(&self) -> &'static str {
        match self {
            Exchange::Nse => ".NS",
            Exchange::Bse => ".BO",
        }
    }

    /// Exchange code used by the Google Finance quote pages.
    pub fn scrape_code(&self) -> &'static str {
        match self {
            Exchange::Nse => "NSE",
            Exchange::Bse => "BOM",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Exchange::Nse => "NSE",
            Exchange::Bse => "BSE",
        }
    }
}

impl std::fmt::Display for Exchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Latest price snapshot for one symbol, tagged with the provider it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub exchange: Exchange,
    pub price: f64,
    pub previous_close: f64,
    pub day_open: Option<f64>,
    pub day_high: Option<f64>,
    pub day_low: Option<f64>,
    pub volume: Option<f64>,
    pub change_pct: f64,
    /// Name of the provider that served this quote.
    pub source: String,
    pub fetched_at: DateTime<Utc>,
}

/// Day change as a percentage of the previous close. Zero when there is no
/// usable previous close.
pub fn change_percent(price: f64, previous_close: f64) -> f64 {
    if previous_close > 0.0 {
        (price - previous_close) / previous_close * 100.0
    } else {
        0.0
    }
}

/// Point-in-time indicator snapshot derived from an OHLCV series.
///
/// SMA fields are `None` when the series is shorter than the window. The
/// `above_sma*` flags are `None` when the corresponding SMA is unavailable,
/// so rule evaluation can distinguish "below" from "unknown".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub last_close: f64,
    pub sma5: Option<f64>,
    pub sma20: Option<f64>,
    pub sma50: Option<f64>,
    pub sma200: Option<f64>,
    pub rsi: f64,
    pub macd: Option<f64>,
    pub vol_ratio: f64,
    pub high_52w: f64,
    pub low_52w: f64,
    pub range_position: f64,
    pub day_change_pct: f64,
    pub above_sma20: Option<bool>,
    pub above_sma50: Option<bool>,
    pub above_sma200: Option<bool>,
    pub support: Option<f64>,
    pub resistance: Option<f64>,
}

/// A dated signed cash flow. Negative = money in (buy), positive = money out
/// (sell or terminal valuation).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CashFlow {
    pub date: NaiveDate,
    pub amount: f64,
}

impl CashFlow {
    pub fn new(date: NaiveDate, amount: f64) -> Self {
        Self { date, amount }
    }
}

/// Recommended action for a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeAction {
    StrongBuy,
    BuyMore,
    Sell,
    PartialSell,
    Hold,
    HoldWatch,
    Wait,
    Exit,
}

impl TradeAction {
    pub fn label(&self) -> &'static str {
        match self {
            TradeAction::StrongBuy => "STRONG BUY",
            TradeAction::BuyMore => "BUY MORE",
            TradeAction::Sell => "SELL",
            TradeAction::PartialSell => "PARTIAL SELL",
            TradeAction::Hold => "HOLD",
            TradeAction::HoldWatch => "HOLD - WATCH",
            TradeAction::Wait => "WAIT",
            TradeAction::Exit => "EXIT",
        }
    }
}

impl std::fmt::Display for TradeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Actionable recommendation for one symbol, with the reasons that fired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub symbol: String,
    pub action: TradeAction,
    pub reasons: Vec<String>,
    pub target: Option<f64>,
    pub stop_loss: Option<f64>,
    pub rsi: f64,
}
