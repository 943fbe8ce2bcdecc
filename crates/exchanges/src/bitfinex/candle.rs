//! Candles synthesized from the public trade tape
//!
//! Bitfinex v1 has no candle endpoint, so a candle is rebuilt on every call
//! from the most recent trades. Nothing is kept between calls.

use crate::types::{Candle, OrderSide, Trade};
use bfx_core::Timestamp;

pub const DEFAULT_INTERVAL_MINUTES: u32 = 1;

/// Inclusion rule for one candle: a trade belongs iff `cutoff <= timestamp`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandleWindow {
    cutoff: f64,
}

impl CandleWindow {
    /// Window of `interval_minutes` ending at `now`
    pub fn ending_at(now: Timestamp, interval_minutes: u32) -> Self {
        Self {
            cutoff: now.as_secs_f64() - interval_span(interval_minutes),
        }
    }

    /// Window anchored on the latency of the tape request itself
    ///
    /// The reference point is `start - completion`, the negated round trip,
    /// so the cutoff is `(start - completion) - interval * 60`.
    pub fn from_request_timing(start: Timestamp, completion: Timestamp, interval_minutes: u32) -> Self {
        let offset = start.as_secs_f64() - completion.as_secs_f64();
        Self {
            cutoff: offset - interval_span(interval_minutes),
        }
    }

    /// Earliest included trade time, unix seconds
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    pub fn contains(&self, trade: &Trade) -> bool {
        self.cutoff <= trade.timestamp as f64
    }
}

fn interval_span(interval_minutes: u32) -> f64 {
    f64::from(interval_minutes) * 60.0
}

/// Aggregate a newest-first tape into one candle
///
/// Open is the first included trade in tape order, close the last. Returns
/// `None` when no trade falls inside the window.
pub fn aggregate(tape: &[Trade], window: &CandleWindow, generated_at: Timestamp) -> Option<Candle> {
    let mut included = tape.iter().filter(|t| window.contains(t));
    let first = included.next()?;

    let mut candle = Candle {
        open: first.price,
        close: first.price,
        low: first.price,
        high: first.price,
        volume: 0.0,
        buy_volume: 0.0,
        sell_volume: 0.0,
        generated_at,
    };

    for trade in std::iter::once(first).chain(included) {
        candle.close = trade.price;
        candle.low = candle.low.min(trade.price);
        candle.high = candle.high.max(trade.price);
        candle.volume += trade.amount;
        match trade.side {
            OrderSide::Buy => candle.buy_volume += trade.amount,
            OrderSide::Sell => candle.sell_volume += trade.amount,
        }
    }

    Some(candle)
}
