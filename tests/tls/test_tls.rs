//! Smoke test for the monoio-native TLS transport

use bfx_exchanges::{HttpsTransport, Transport};
use std::time::Duration;
use url::Url;

#[monoio::main(timer_enabled = true)]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🚀 Testing monoio-native TLS transport");

    let transport = HttpsTransport::new(Duration::from_secs(5));
    println!("✅ HTTPS transport created (timeout {:?})", transport.timeout());

    println!("🏓 Fetching BTC/USD ticker from Bitfinex...");
    let url = Url::parse("https://api.bitfinex.com/v1/pubticker/btcusd")?;
    let response = transport.get(&url).await?;

    println!("📡 Response Status: {}", response.status);
    println!("📊 Content-Type: {:?}", response.header("content-type"));
    println!("📄 Response Body: {}", response.body);

    if response.is_success() {
        println!("✅ TLS integration working correctly!");
    } else {
        println!("❌ Unexpected response status: {}", response.status);
    }

    Ok(())
}
