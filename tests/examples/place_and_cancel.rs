//! Place a far-from-market limit order, confirm it, then cancel it
//!
//! Requires `BFX_API_KEY`/`BFX_API_SECRET`. The order is priced at half the
//! best bid so it rests on the book instead of filling.

use bfx_core::prelude::*;
use bfx_exchanges::prelude::*;
use tracing::{error, info};

#[monoio::main(timer_enabled = true)]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_logging();

    let config = ExchangeConfig::from_env()?.with_env_credentials()?;
    let amount: f64 = std::env::var("BFX_DEMO_AMOUNT")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(0.0002);

    let exchange = BitfinexExchange::new(config)?;
    let trading = exchange.trading()?;

    info!("💰 Balances:");
    for wallet in trading.wallets().await? {
        info!("   {:<8} {:<5} {} (available {})", wallet.wallet, wallet.currency, wallet.amount, wallet.available);
    }

    let book = exchange.market().order_book(None, Some(1)).await?;
    let price = (book.best_bid / 2.0).round();
    info!("📋 Placing buy {} @ {} (best bid {})", amount, price, book.best_bid);

    let order = trading.place_order(amount, price, OrderSide::Buy, None, None).await?;
    info!("✅ Order {} placed at {}", order.id, order.timestamp);

    let status = trading.order_status(order.id).await?;
    info!("🔎 Status: {:?}", status.state);

    let active = trading.active_orders().await?;
    info!("📂 {} active order(s)", active.len());

    if trading.cancel_order(order.id).await? {
        info!("🗑️  Order {} cancelled", order.id);
    } else {
        error!("❌ Order {} not confirmed cancelled; check open orders", order.id);
    }

    for fill in trading.history_trades(None).await?.iter().take(5) {
        info!("   fill {} {} {} @ {}", fill.order_id, fill.side, fill.amount, fill.price);
    }

    Ok(())
}
