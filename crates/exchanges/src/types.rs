//! Normalized records returned by the clients
//!
//! Every numeric field is an `f64` coerced from the exchange's
//! decimal-looking strings. Records are snapshots: nothing here is mutated
//! after it is built, and nothing is cached between calls.

use crate::errors::ExchangeError;
use bfx_core::Timestamp;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Base/quote asset pair, e.g. `btc`/`usd`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TradingPair {
    pub base: String,
    pub quote: String,
}

impl TradingPair {
    pub fn new(base: impl Into<String>, quote: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            quote: quote.into(),
        }
    }

    /// Exchange symbol: base and quote concatenated (`btcusd`)
    pub fn symbol(&self) -> String {
        format!("{}{}", self.base, self.quote)
    }
}

impl std::fmt::Display for TradingPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.base, self.quote)
    }
}

/// Order or trade side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "buy",
            OrderSide::Sell => "sell",
        }
    }
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderSide {
    type Err = ExchangeError;

    /// Case-insensitive: trade history reports `Buy`/`Sell`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("buy") {
            Ok(OrderSide::Buy)
        } else if s.eq_ignore_ascii_case("sell") {
            Ok(OrderSide::Sell)
        } else {
            Err(ExchangeError::DataFormatError(format!("unknown side '{s}'")))
        }
    }
}

/// Order types accepted by `/v1/order/new`
///
/// The `Exchange*` variants trade the exchange wallet; the bare ones trade
/// the margin wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OrderType {
    Market,
    Limit,
    Stop,
    TrailingStop,
    FillOrKill,
    ExchangeMarket,
    #[default]
    ExchangeLimit,
    ExchangeStop,
    ExchangeTrailingStop,
    ExchangeFillOrKill,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Market => "market",
            OrderType::Limit => "limit",
            OrderType::Stop => "stop",
            OrderType::TrailingStop => "trailing-stop",
            OrderType::FillOrKill => "fill-or-kill",
            OrderType::ExchangeMarket => "exchange market",
            OrderType::ExchangeLimit => "exchange limit",
            OrderType::ExchangeStop => "exchange stop",
            OrderType::ExchangeTrailingStop => "exchange trailing-stop",
            OrderType::ExchangeFillOrKill => "exchange fill-or-kill",
        }
    }
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order state as last reported by the exchange
///
/// `Unknown` covers filled orders and responses without lifecycle flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderState {
    Open,
    Cancelled,
    Unknown,
}

impl OrderState {
    /// Derive from `is_live`/`is_cancelled`; cancellation wins
    pub fn from_flags(is_live: Option<bool>, is_cancelled: Option<bool>) -> Self {
        match (is_live, is_cancelled) {
            (_, Some(true)) => OrderState::Cancelled,
            (Some(true), _) => OrderState::Open,
            _ => OrderState::Unknown,
        }
    }
}

/// One print from the public trade tape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub tid: Option<i64>,
    pub price: f64,
    pub amount: f64,
    pub side: OrderSide,
    /// Unix seconds
    pub timestamp: i64,
}

/// OHLCV summary synthesized from the trade tape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open: f64,
    pub close: f64,
    pub low: f64,
    pub high: f64,
    pub volume: f64,
    pub buy_volume: f64,
    pub sell_volume: f64,
    pub generated_at: Timestamp,
}

/// 24h ticker
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    pub high: f64,
    pub low: f64,
    pub last: f64,
    pub volume: f64,
}

/// Price levels of the order book in exchange order
///
/// `best_ask`/`best_bid` are the first levels as sent; the client does not
/// re-sort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    pub best_ask: f64,
    pub best_bid: f64,
    pub asks: Vec<f64>,
    pub bids: Vec<f64>,
}

impl OrderBookSnapshot {
    pub fn spread(&self) -> f64 {
        self.best_ask - self.best_bid
    }
}

/// Order record normalized from new/status/active-order responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub symbol: Option<String>,
    pub side: OrderSide,
    pub price: f64,
    /// Original amount
    pub amount: f64,
    pub timestamp: f64,
    pub state: OrderState,
}

/// One of our own fills from `/v1/mytrades`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutedTrade {
    pub order_id: i64,
    pub tid: Option<i64>,
    pub symbol: String,
    pub side: OrderSide,
    pub price: f64,
    pub amount: f64,
    pub timestamp: f64,
}

/// Wallet line from `/v1/balances`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletBalance {
    /// `exchange`, `trading` or `deposit`
    pub wallet: String,
    pub currency: String,
    pub amount: f64,
    pub available: f64,
}
