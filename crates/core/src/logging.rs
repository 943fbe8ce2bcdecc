//! Unified logging integration
//!
//! ftlog is the default backend; `tracing` events reach it through the
//! `log` bridge. With the `ftlog` feature off, a tracing-subscriber
//! formatter is installed instead, filtered by `RUST_LOG`.

#[cfg(not(feature = "ftlog"))]
use tracing::Level;
#[cfg(not(feature = "ftlog"))]
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize logging once per process; later calls are no-ops
pub fn init_logging() {
    INIT.call_once(|| {
        #[cfg(feature = "ftlog")]
        {
            init_ftlog();
        }

        #[cfg(not(feature = "ftlog"))]
        {
            init_tracing();
        }
    });
}

#[cfg(feature = "ftlog")]
fn init_ftlog() {
    let level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| raw.parse::<ftlog::LevelFilter>().ok())
        .unwrap_or(ftlog::LevelFilter::Info);

    match ftlog::builder()
        .max_log_level(level)
        .bounded(100_000, false)
        .utc()
        .try_init()
    {
        // The guard flushes on drop; logging must outlive every caller.
        Ok(guard) => std::mem::forget(guard),
        Err(e) => eprintln!("ftlog init failed: {e}"),
    }

    tracing::info!("📝 Initialized ftlog logging");
}

#[cfg(not(feature = "ftlog"))]
fn init_tracing() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("tracing init failed: {e}");
    }

    tracing::info!("📝 Initialized tracing logging");
}

/// Order lifecycle event
#[macro_export]
macro_rules! log_order {
    ($action:expr, $order_id:expr, $symbol:expr) => {
        tracing::info!("📋 ORDER {}: {} ({})", $action, $order_id, $symbol);
    };
}

/// Failed operation
#[macro_export]
macro_rules! log_error {
    ($operation:expr, $error:expr) => {
        tracing::error!("❌ {} failed: {}", $operation, $error);
    };
}
