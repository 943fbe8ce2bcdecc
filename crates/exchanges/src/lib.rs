//! # bfx exchange client
//!
//! Bitfinex v1 HTTP trading API on a single-threaded monoio runtime.
//!
//! ## Architecture
//!
//! - **monoio-native HTTPS** - rustls over monoio TCP, one request per call
//! - **Transport seam** - clients are generic over [`Transport`] so tests can script responses
//! - **Pure signing** - payloads are built fresh per call, callers' params are never touched
//! - **Trade-tape candles** - OHLCV synthesized from public trades
//!
//! ```no_run
//! use bfx_exchanges::prelude::*;
//!
//! fn main() -> bfx_exchanges::Result<()> {
//!     let config = ExchangeConfig::from_env()?;
//!     let market = MarketDataClient::new(config)?;
//!
//!     let ticker = Runtime::default()
//!         .block_on(async move { market.ticker(None).await })
//!         .map_err(|e| ExchangeError::ConfigurationError(e.to_string()))??;
//!     println!("last: {}", ticker.last);
//!     Ok(())
//! }
//! ```

#[cfg(feature = "bitfinex")]
pub mod bitfinex;
pub mod errors;
pub mod http;
pub mod traits;
pub mod types;

#[cfg(feature = "bitfinex")]
pub use bitfinex::{BitfinexExchange, ExchangeConfig, MarketDataClient, TradingClient};
pub use errors::{ExchangeError, Result};
pub use http::{HttpResponse, HttpsTransport};
pub use traits::Transport;
pub use types::*;

/// Prelude for convenient imports
pub mod prelude {
    #[cfg(feature = "bitfinex")]
    pub use crate::bitfinex::{BitfinexExchange, CandleWindow, Credentials, ExchangeConfig, MarketDataClient, RequestSigner, TradingClient};
    pub use crate::errors::{ExchangeError, Result};
    pub use crate::http::{HttpResponse, HttpsTransport};
    pub use crate::traits::Transport;
    pub use crate::types::*;
    pub use bfx_core::prelude::*;
}
