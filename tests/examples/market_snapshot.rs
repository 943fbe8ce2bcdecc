//! Public market snapshot for the configured pair
//!
//! Demonstrates:
//! - Configuration from `.env` / `BFX_*` variables
//! - Ticker, order book and last trade over monoio-native HTTPS
//! - A 1-minute candle synthesized from the trade tape

use bfx_core::prelude::*;
use bfx_exchanges::prelude::*;
use tracing::{info, warn};

#[monoio::main(timer_enabled = true)]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_logging();

    let config = ExchangeConfig::from_env()?;
    let pair = config.default_pair.clone();

    info!("🚀 Bitfinex market snapshot for {}", pair);
    info!("   Base URL: {}", config.base_url);
    info!("   Timeout: {}ms", config.timeout_ms);

    let market = MarketDataClient::new(config)?;

    let timer = PerfTimer::start("ticker");
    let ticker = market.ticker(None).await?;
    timer.log_elapsed();
    info!("📈 Ticker: high={} low={} last={} volume={}", ticker.high, ticker.low, ticker.last, ticker.volume);

    let book = market.order_book(None, Some(25)).await?;
    info!("📚 Book: best ask={} best bid={} spread={:.4}", book.best_ask, book.best_bid, book.spread());
    info!("   {} asks / {} bids", book.asks.len(), book.bids.len());

    let last = market.last_price(None).await?;
    info!("💱 Last trade: {}", last);

    match market.candle(None, None).await? {
        Some(candle) => {
            info!("🕯️ 1m candle at {}", candle.generated_at);
            info!("   O={} C={} L={} H={}", candle.open, candle.close, candle.low, candle.high);
            info!("   volume={} (buy {} / sell {})", candle.volume, candle.buy_volume, candle.sell_volume);
        }
        None => warn!("⚠️  No trades in the last minute"),
    }

    Ok(())
}
