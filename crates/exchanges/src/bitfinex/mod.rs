//! Bitfinex v1 REST integration
//!
//! - `market`: public reads (ticker, book, tape, candles)
//! - `trading`: signed order lifecycle, balances and fills
//! - `auth`: HMAC-SHA384 payload signing
//! - `candle`: OHLCV aggregation over a trade tape

pub mod auth;
pub mod candle;
pub mod config;
pub mod market;
pub mod trading;
pub mod wire;

pub use auth::{Credentials, RequestSigner, SignedHeaders};
pub use candle::{CandleWindow, DEFAULT_INTERVAL_MINUTES};
pub use config::{ExchangeConfig, BITFINEX_BASE_URL, DEFAULT_TIMEOUT_MS};
pub use market::MarketDataClient;
pub use trading::TradingClient;

use crate::errors::{ExchangeError, Result};
use crate::http::HttpsTransport;
use crate::traits::Transport;
use url::Url;

/// `base` with `path` and, when non-empty, the query `params`
pub(crate) fn endpoint(base: &Url, path: &str, params: &[(&str, String)]) -> Url {
    let mut url = base.clone();
    url.set_path(path);
    url.set_query(None);

    if !params.is_empty() {
        let mut query = url.query_pairs_mut();
        for (key, value) in params {
            query.append_pair(key, value);
        }
    }

    url
}

/// Market data plus, when credentials are configured, trading
///
/// Both halves share one transport and one configuration.
pub struct BitfinexExchange<T: Transport + Clone = HttpsTransport> {
    market: MarketDataClient<T>,
    trading: Option<TradingClient<T>>,
}

impl BitfinexExchange<HttpsTransport> {
    pub fn new(config: ExchangeConfig) -> Result<Self> {
        let transport = HttpsTransport::new(config.timeout());
        Self::with_transport(config, transport)
    }
}

impl<T: Transport + Clone> BitfinexExchange<T> {
    pub fn with_transport(config: ExchangeConfig, transport: T) -> Result<Self> {
        let trading = if config.has_credentials() {
            Some(TradingClient::with_transport(config.clone(), transport.clone())?)
        } else {
            None
        };
        let market = MarketDataClient::with_transport(config, transport)?;

        Ok(Self { market, trading })
    }

    pub fn market(&self) -> &MarketDataClient<T> {
        &self.market
    }

    /// Trading half; `MissingCredentials` for a public-only configuration
    pub fn trading(&self) -> Result<&TradingClient<T>> {
        self.trading
            .as_ref()
            .ok_or_else(|| ExchangeError::MissingCredentials("api_key/api_secret".to_string()))
    }

    pub fn config(&self) -> &ExchangeConfig {
        self.market.config()
    }
}
