//! Bitfinex v1 response normalization
//!
//! The exchange sends numbers as decimal strings (`"price": "9501.5"`) and
//! occasionally as bare JSON numbers. Everything is coerced to `f64`/`i64`
//! here; a missing or non-numeric field is a `DataFormatError`.

use crate::errors::{ExchangeError, Result};
use crate::http::HttpResponse;
use crate::types::{ExecutedTrade, Order, OrderBookSnapshot, OrderState, Ticker, Trade, WalletBalance};
use serde_json::Value;

pub(crate) fn field<'a>(value: &'a Value, key: &str) -> Result<&'a Value> {
    match value.get(key) {
        Some(Value::Null) | None => Err(ExchangeError::missing_field(key)),
        Some(v) => Ok(v),
    }
}

pub(crate) fn number(value: &Value, key: &str) -> Result<f64> {
    match field(value, key)? {
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ExchangeError::DataFormatError(format!("field '{key}' is not numeric: '{s}'"))),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| ExchangeError::DataFormatError(format!("field '{key}' out of range"))),
        other => Err(ExchangeError::DataFormatError(format!(
            "field '{key}' is not numeric: {other}"
        ))),
    }
}

/// `f` as an exact `i64`, or `None` if it is not finite, has a fractional
/// part or lies outside the `i64` range
fn whole(f: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound
    let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
    (f.is_finite() && f.fract() == 0.0 && in_range).then_some(f as i64)
}

/// Integer field; integral decimal strings such as `"1467.0"` are accepted
pub(crate) fn integer(value: &Value, key: &str) -> Result<i64> {
    let not_integer = |raw: &dyn std::fmt::Display| {
        ExchangeError::DataFormatError(format!("field '{key}' is not an integer: '{raw}'"))
    };

    match field(value, key)? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(whole))
            .ok_or_else(|| not_integer(n)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(whole))
                .ok_or_else(|| not_integer(&s))
        }
        other => Err(ExchangeError::DataFormatError(format!(
            "field '{key}' is not an integer: {other}"
        ))),
    }
}

fn optional_integer(value: &Value, key: &str) -> Result<Option<i64>> {
    match value.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(_) => integer(value, key).map(Some),
    }
}

fn optional_number(value: &Value, key: &str) -> Result<Option<f64>> {
    match value.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(_) => number(value, key).map(Some),
    }
}

pub(crate) fn text<'a>(value: &'a Value, key: &str) -> Result<&'a str> {
    field(value, key)?
        .as_str()
        .ok_or_else(|| ExchangeError::DataFormatError(format!("field '{key}' is not a string")))
}

pub(crate) fn optional_flag(value: &Value, key: &str) -> Result<Option<bool>> {
    match value.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(ExchangeError::DataFormatError(format!(
            "field '{key}' is not a boolean: {other}"
        ))),
    }
}

pub(crate) fn flag(value: &Value, key: &str) -> Result<bool> {
    optional_flag(value, key)?.ok_or_else(|| ExchangeError::missing_field(key))
}

pub(crate) fn array<'a>(value: &'a Value, what: &str) -> Result<&'a Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| ExchangeError::DataFormatError(format!("{what} is not an array")))
}

/// Reject non-2xx responses and parse the JSON body
pub(crate) fn decode_body(response: &HttpResponse) -> Result<Value> {
    if !response.is_success() {
        return Err(ExchangeError::HttpError(response.status, response.body.clone()));
    }
    serde_json::from_str(&response.body).map_err(|e| {
        ExchangeError::DataFormatError(format!("invalid JSON ({e}): {}", response.body))
    })
}

/// Entry of `/v1/trades/{symbol}`
pub fn parse_trade(value: &Value) -> Result<Trade> {
    Ok(Trade {
        tid: optional_integer(value, "tid")?,
        price: number(value, "price")?,
        amount: number(value, "amount")?,
        side: text(value, "type")?.parse()?,
        timestamp: integer(value, "timestamp")?,
    })
}

/// `/v1/pubticker/{symbol}`
pub fn parse_ticker(value: &Value) -> Result<Ticker> {
    Ok(Ticker {
        high: number(value, "high")?,
        low: number(value, "low")?,
        last: number(value, "last_price")?,
        volume: number(value, "volume")?,
    })
}

fn book_side(book: &Value, side: &str) -> Result<Vec<f64>> {
    array(field(book, side)?, side)?
        .iter()
        .map(|level| number(level, "price"))
        .collect()
}

/// `/v1/book/{symbol}`; both sides must be non-empty
pub fn parse_order_book(value: &Value) -> Result<OrderBookSnapshot> {
    let asks = book_side(value, "asks")?;
    let bids = book_side(value, "bids")?;

    let best_ask = *asks
        .first()
        .ok_or_else(|| ExchangeError::DataFormatError("order book has no asks".to_string()))?;
    let best_bid = *bids
        .first()
        .ok_or_else(|| ExchangeError::DataFormatError("order book has no bids".to_string()))?;

    Ok(OrderBookSnapshot {
        best_ask,
        best_bid,
        asks,
        bids,
    })
}

/// Order record from `/v1/order/new`, `/v1/order/status` or `/v1/orders`
pub fn parse_order(value: &Value) -> Result<Order> {
    Ok(Order {
        id: integer(value, "id")?,
        symbol: value.get("symbol").and_then(Value::as_str).map(str::to_string),
        side: text(value, "side")?.parse()?,
        price: number(value, "price")?,
        amount: number(value, "original_amount")?,
        timestamp: number(value, "timestamp")?,
        state: OrderState::from_flags(
            optional_flag(value, "is_live")?,
            optional_flag(value, "is_cancelled")?,
        ),
    })
}

/// Entry of `/v1/mytrades`; the symbol is the one the history was requested for
pub fn parse_executed_trade(value: &Value, symbol: &str) -> Result<ExecutedTrade> {
    Ok(ExecutedTrade {
        order_id: integer(value, "order_id")?,
        tid: optional_integer(value, "tid")?,
        symbol: symbol.to_string(),
        side: text(value, "type")?.parse()?,
        price: number(value, "price")?,
        amount: number(value, "amount")?,
        timestamp: number(value, "timestamp")?,
    })
}

/// Entry of `/v1/balances`
pub fn parse_wallet(value: &Value) -> Result<WalletBalance> {
    Ok(WalletBalance {
        wallet: text(value, "type")?.to_string(),
        currency: text(value, "currency")?.to_string(),
        amount: number(value, "amount")?,
        available: optional_number(value, "available")?.unwrap_or(0.0),
    })
}

/// Apply `parse` to every element of a JSON array
pub(crate) fn parse_list<T>(value: &Value, what: &str, parse: impl Fn(&Value) -> Result<T>) -> Result<Vec<T>> {
    array(value, what)?.iter().map(parse).collect()
}
