//! Public market data: ticker, order book, trade tape and synthesized candles

use crate::bitfinex::candle::{self, CandleWindow, DEFAULT_INTERVAL_MINUTES};
use crate::bitfinex::config::ExchangeConfig;
use crate::bitfinex::endpoint;
use crate::bitfinex::wire::{self, decode_body};
use crate::errors::{ExchangeError, Result};
use crate::http::HttpsTransport;
use crate::traits::Transport;
use crate::types::{Candle, OrderBookSnapshot, Ticker, Trade, TradingPair};
use bfx_core::{PerfTimer, Timestamp};
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

/// Tape length used by `last_price`
pub const LAST_PRICE_TAPE: u32 = 20;
/// Tape length used by `candle`
pub const CANDLE_TAPE: u32 = 200;
/// Levels per side requested by `order_book` when no depth is given
pub const DEFAULT_BOOK_DEPTH: u32 = 100;

/// Unauthenticated Bitfinex client
///
/// Every call is a single GET; nothing is cached between calls.
pub struct MarketDataClient<T: Transport = HttpsTransport> {
    config: ExchangeConfig,
    base_url: Url,
    transport: T,
}

impl MarketDataClient<HttpsTransport> {
    pub fn new(config: ExchangeConfig) -> Result<Self> {
        let transport = HttpsTransport::new(config.timeout());
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> MarketDataClient<T> {
    pub fn with_transport(config: ExchangeConfig, transport: T) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;

        info!("🔗 Bitfinex market data client created");
        info!("   Base URL: {}", base_url);

        Ok(Self {
            config,
            base_url,
            transport,
        })
    }

    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    fn pair<'a>(&'a self, pair: Option<&'a TradingPair>) -> &'a TradingPair {
        pair.unwrap_or(&self.config.default_pair)
    }

    async fn public_get(&self, path: &str, params: &[(&str, String)]) -> Result<Value> {
        let _timer = PerfTimer::start(format!("bitfinex_get_{path}"));
        let url = endpoint(&self.base_url, path, params);

        let response = self.transport.get(&url).await?;
        if !response.is_success() {
            warn!("GET {} returned {}", path, response.status);
        }

        decode_body(&response)
    }

    /// Most recent trades, newest first
    pub async fn trades(&self, pair: Option<&TradingPair>, limit: u32) -> Result<Vec<Trade>> {
        let path = format!("/v1/trades/{}", self.pair(pair).symbol());
        let body = self
            .public_get(&path, &[("limit_trades", limit.to_string())])
            .await?;

        wire::parse_list(&body, "trade tape", wire::parse_trade)
    }

    /// Price of the most recent trade
    pub async fn last_price(&self, pair: Option<&TradingPair>) -> Result<f64> {
        let tape = self.trades(pair, LAST_PRICE_TAPE).await?;
        tape.first()
            .map(|trade| trade.price)
            .ok_or_else(|| ExchangeError::DataFormatError("trade tape is empty".to_string()))
    }

    /// 24h high, low, last price and volume
    pub async fn ticker(&self, pair: Option<&TradingPair>) -> Result<Ticker> {
        let path = format!("/v1/pubticker/{}", self.pair(pair).symbol());
        let body = self.public_get(&path, &[]).await?;
        wire::parse_ticker(&body)
    }

    /// Order book prices as ordered by the exchange
    pub async fn order_book(&self, pair: Option<&TradingPair>, depth: Option<u32>) -> Result<OrderBookSnapshot> {
        let depth = depth.unwrap_or(DEFAULT_BOOK_DEPTH).to_string();
        let path = format!("/v1/book/{}", self.pair(pair).symbol());
        let body = self
            .public_get(&path, &[("limit_bids", depth.clone()), ("limit_asks", depth)])
            .await?;

        wire::parse_order_book(&body)
    }

    /// Candle over the last `interval` minutes of the tape
    ///
    /// The window is anchored on the tape request's own timing, see
    /// [`CandleWindow::from_request_timing`]. `Ok(None)` means no trade fell
    /// inside the window.
    pub async fn candle(&self, pair: Option<&TradingPair>, interval: Option<u32>) -> Result<Option<Candle>> {
        let interval = interval.unwrap_or(DEFAULT_INTERVAL_MINUTES);

        let start = Timestamp::now();
        let tape = self.trades(pair, CANDLE_TAPE).await?;
        let completion = Timestamp::now();

        let window = CandleWindow::from_request_timing(start, completion, interval);
        let candle = candle::aggregate(&tape, &window, Timestamp::now());

        match &candle {
            Some(c) => debug!("🕯️ {}m candle from {} trades: o={} c={} v={}", interval, tape.len(), c.open, c.close, c.volume),
            None => debug!("🕯️ no trades inside {}m window", interval),
        }

        Ok(candle)
    }
}
