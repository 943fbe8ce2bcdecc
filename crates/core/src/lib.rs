//! # bfx core
//!
//! Runtime and utility layer shared by the Bitfinex client crates.
//!
//! ## Architecture Principles
//!
//! 1. **Single-threaded async with monoio** - one request in flight at a time
//! 2. **Wall-clock timing** - request latency and candle windows share one clock
//! 3. **Monotonic nonces** - strictly increasing per credential pair
//! 4. **Unified logging** - ftlog backend, tracing macros everywhere

pub mod runtime;
pub mod timing;
pub mod nonce;
pub mod logging;

// Re-export commonly used items
pub use runtime::{Runtime, RuntimeConfig};
pub use timing::{nanos, unix_millis, unix_secs_f64, PerfTimer, Timestamp};
pub use nonce::NonceGenerator;
pub use logging::init_logging;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::runtime::{Runtime, RuntimeConfig, run_blocking};
    pub use crate::timing::{nanos, unix_millis, unix_secs_f64, PerfTimer, Timestamp};
    pub use crate::nonce::NonceGenerator;
    pub use crate::logging::init_logging;

    // Common external types
    pub use monoio;
    pub use serde::{Deserialize, Serialize};
    pub use chrono::{DateTime, Utc};
}
