//! Authenticated trading: orders, balances and trade history
//!
//! Every call is one signed POST, except `cancel_order` which needs two.
//! Order state is never inferred locally; it is whatever the exchange last
//! reported. Failed calls are logged and returned, never retried.

use crate::bitfinex::auth::RequestSigner;
use crate::bitfinex::config::ExchangeConfig;
use crate::bitfinex::endpoint;
use crate::bitfinex::wire::{self, decode_body};
use crate::errors::{ExchangeError, Result};
use crate::http::HttpsTransport;
use crate::traits::Transport;
use crate::types::{ExecutedTrade, Order, OrderSide, OrderType, TradingPair, WalletBalance};
use bfx_core::{log_error, log_order, PerfTimer};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::info;
use url::Url;

#[derive(Serialize)]
struct NewOrderParams<'a> {
    symbol: String,
    amount: String,
    price: String,
    side: &'a str,
    #[serde(rename = "type")]
    order_type: &'a str,
}

#[derive(Serialize)]
struct OrderIdParams {
    order_id: i64,
}

#[derive(Serialize)]
struct SymbolParams {
    symbol: String,
}

/// Signed Bitfinex client for one credential pair
///
/// The signer owns the nonce sequence, so one key should be driven through
/// one `TradingClient`.
pub struct TradingClient<T: Transport = HttpsTransport> {
    config: ExchangeConfig,
    base_url: Url,
    signer: RequestSigner,
    transport: T,
}

impl TradingClient<HttpsTransport> {
    pub fn new(config: ExchangeConfig) -> Result<Self> {
        let transport = HttpsTransport::new(config.timeout());
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> TradingClient<T> {
    pub fn with_transport(config: ExchangeConfig, transport: T) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        let signer = RequestSigner::new(config.credentials()?)?;

        info!("🔗 Bitfinex trading client created for key {}…", key_prefix(signer.api_key()));

        Ok(Self {
            config,
            base_url,
            signer,
            transport,
        })
    }

    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    fn pair<'a>(&'a self, pair: Option<&'a TradingPair>) -> &'a TradingPair {
        pair.unwrap_or(&self.config.default_pair)
    }

    /// Sign `params` for `request`, POST, and decode the reply
    async fn auth_call<P: Serialize + ?Sized>(&self, request: &str, params: &P) -> Result<Value> {
        let _timer = PerfTimer::start(format!("bitfinex_post_{request}"));

        let headers = self.signer.sign(request, params)?;
        let url = endpoint(&self.base_url, request, &[]);
        let response = self.transport.post(&url, &headers.as_pairs()).await?;

        if !response.is_success() {
            let err = ExchangeError::HttpError(response.status, response.body);
            log_error!(request, err);
            return Err(err);
        }

        decode_body(&response)
    }

    /// Place an order; `order_type` defaults to `exchange limit`
    pub async fn place_order(
        &self,
        amount: f64,
        price: f64,
        side: OrderSide,
        pair: Option<&TradingPair>,
        order_type: Option<OrderType>,
    ) -> Result<Order> {
        let symbol = self.pair(pair).symbol();
        let params = NewOrderParams {
            symbol: symbol.clone(),
            amount: amount.to_string(),
            price: price.to_string(),
            side: side.as_str(),
            order_type: order_type.unwrap_or_default().as_str(),
        };

        let body = self.auth_call("/v1/order/new", &params).await?;
        let order = wire::parse_order(&body)?;

        log_order!("PLACED", order.id, symbol);
        Ok(order)
    }

    /// Cancel an order and confirm with a status query
    ///
    /// The status query uses the id echoed by the cancel response. `true`
    /// only if the exchange reports the order as cancelled. The two calls
    /// are not atomic: if the second one fails, the cancel may or may not
    /// have taken effect and the caller has to query again.
    pub async fn cancel_order(&self, order_id: i64) -> Result<bool> {
        let ack = self
            .auth_call("/v1/order/cancel", &OrderIdParams { order_id })
            .await?;
        let echoed = wire::integer(&ack, "id")?;

        let status = self
            .auth_call("/v1/order/status", &OrderIdParams { order_id: echoed })
            .await?;
        let cancelled = wire::flag(&status, "is_cancelled")?;

        let symbol = status.get("symbol").and_then(Value::as_str).unwrap_or("-");
        if cancelled {
            log_order!("CANCELLED", echoed, symbol);
        } else {
            log_order!("CANCEL UNCONFIRMED", echoed, symbol);
        }

        Ok(cancelled)
    }

    pub async fn order_status(&self, order_id: i64) -> Result<Order> {
        let body = self
            .auth_call("/v1/order/status", &OrderIdParams { order_id })
            .await?;
        wire::parse_order(&body)
    }

    pub async fn active_orders(&self) -> Result<Vec<Order>> {
        let body = self.auth_call("/v1/orders", &()).await?;
        wire::parse_list(&body, "active orders", wire::parse_order)
    }

    /// Amount per currency; a currency held in several wallets keeps the last one listed
    pub async fn balance(&self) -> Result<HashMap<String, f64>> {
        Ok(self
            .wallets()
            .await?
            .into_iter()
            .map(|w| (w.currency, w.amount))
            .collect())
    }

    /// Every wallet line from `/v1/balances`
    pub async fn wallets(&self) -> Result<Vec<WalletBalance>> {
        let body = self.auth_call("/v1/balances", &()).await?;
        wire::parse_list(&body, "balances", wire::parse_wallet)
    }

    /// Our own fills on `pair`, in exchange order
    pub async fn history_trades(&self, pair: Option<&TradingPair>) -> Result<Vec<ExecutedTrade>> {
        let symbol = self.pair(pair).symbol();
        let body = self
            .auth_call("/v1/mytrades", &SymbolParams { symbol: symbol.clone() })
            .await?;

        wire::parse_list(&body, "trade history", |v| wire::parse_executed_trade(v, &symbol))
    }
}

fn key_prefix(key: &str) -> &str {
    key.get(..6).unwrap_or(key)
}
