//! Scripted transport and fixtures shared by the test suites

use async_trait::async_trait;
use bfx_exchanges::bitfinex::auth::decode_payload;
use bfx_exchanges::{ExchangeConfig, ExchangeError, HttpResponse, Result, Transport};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::VecDeque;
use url::Url;

/// One request as seen by the transport
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub url: Url,
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Decoded `X-BFX-PAYLOAD`, if the request was signed
    pub fn payload(&self) -> Option<Value> {
        self.header("X-BFX-PAYLOAD")
            .and_then(|raw| decode_payload(raw).ok())
    }
}

/// Replays queued responses in order and records every request
///
/// Running out of responses yields a `NetworkError`, so an unexpected
/// extra call fails the test instead of hanging.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: RefCell<VecDeque<Result<HttpResponse>>>,
    requests: RefCell<Vec<RecordedRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, status: u16, body: impl Into<String>) -> Self {
        self.responses
            .borrow_mut()
            .push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    pub fn with_json(self, body: Value) -> Self {
        self.with_response(200, body.to_string())
    }

    pub fn with_error(self, error: ExchangeError) -> Self {
        self.responses.borrow_mut().push_back(Err(error));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.borrow().clone()
    }

    pub fn remaining(&self) -> usize {
        self.responses.borrow().len()
    }

    fn next(&self, method: &'static str, url: &Url, headers: &[(&str, &str)]) -> Result<HttpResponse> {
        self.requests.borrow_mut().push(RecordedRequest {
            method,
            url: url.clone(),
            headers: headers
                .iter()
                .map(|(n, v)| (n.to_string(), v.to_string()))
                .collect(),
        });

        self.responses.borrow_mut().pop_front().unwrap_or_else(|| {
            Err(ExchangeError::NetworkError(format!(
                "no scripted response for {method} {url}"
            )))
        })
    }
}

#[async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &Url) -> Result<HttpResponse> {
        self.next("GET", url, &[])
    }

    async fn post(&self, url: &Url, headers: &[(&str, &str)]) -> Result<HttpResponse> {
        self.next("POST", url, headers)
    }
}

/// Config with throwaway credentials
pub fn test_config() -> ExchangeConfig {
    ExchangeConfig::default().with_credentials("test-api-key", "test-secret-key")
}

/// Public trade tape entry in wire format
pub fn trade_json(price: f64, amount: f64, side: &str, timestamp: i64) -> Value {
    json!({
        "timestamp": timestamp,
        "tid": timestamp,
        "price": price.to_string(),
        "amount": amount.to_string(),
        "exchange": "bitfinex",
        "type": side,
    })
}

/// Order record in wire format
pub fn order_json(id: i64, is_live: bool, is_cancelled: bool) -> Value {
    json!({
        "id": id,
        "symbol": "btcusd",
        "exchange": null,
        "price": "250.0",
        "avg_execution_price": "0.0",
        "side": "buy",
        "type": "exchange limit",
        "timestamp": "1444272165.0",
        "is_live": is_live,
        "is_cancelled": is_cancelled,
        "original_amount": "0.5",
        "remaining_amount": "0.5",
        "executed_amount": "0.0",
    })
}
