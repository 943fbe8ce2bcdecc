//! Monotonic nonce generation for signed requests
//!
//! Bitfinex rejects any authenticated call whose nonce is not greater than
//! the last one it accepted for the same key. Nonces are millisecond wall
//! clock values, bumped by one whenever the clock has not advanced (or has
//! gone backwards) since the previous call.

use crate::timing::unix_millis;
use std::sync::atomic::{AtomicU64, Ordering};

/// Strictly increasing millisecond nonce source
///
/// One generator belongs to one credential pair. Two generators signing for
/// the same key (or two processes) can still collide on the exchange side.
#[derive(Debug, Default)]
pub struct NonceGenerator {
    last: AtomicU64,
}

impl NonceGenerator {
    /// Create a generator that starts from the current clock
    pub const fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    /// Create a generator whose next nonce is above `floor`
    pub fn with_floor(floor: u64) -> Self {
        Self {
            last: AtomicU64::new(floor),
        }
    }

    /// Next nonce: `max(now_ms, last + 1)`
    pub fn next(&self) -> u64 {
        let now = unix_millis();
        let mut prev = self.last.load(Ordering::Acquire);
        loop {
            let candidate = now.max(prev.saturating_add(1));
            match self.last.compare_exchange_weak(
                prev,
                candidate,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return candidate,
                Err(actual) => prev = actual,
            }
        }
    }

    /// Next nonce rendered the way the exchange expects it
    pub fn next_string(&self) -> String {
        self.next().to_string()
    }

    /// Last nonce handed out (0 if none)
    pub fn last(&self) -> u64 {
        self.last.load(Ordering::Acquire)
    }
}
