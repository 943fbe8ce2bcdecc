//! Blocking entry point over the monoio runtime
//!
//! Client operations are `async fn`s that issue one request (two for a
//! cancel) and await it to completion. Callers that want plain blocking
//! calls wrap them in [`Runtime::block_on`].

use monoio::{FusionDriver, RuntimeBuilder};
use tracing::info;

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Name reported in logs
    pub thread_name: String,
    /// Timers back the per-request timeout; disable only for pure tests
    pub enable_timer: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            thread_name: "bfx-main".to_string(),
            enable_timer: true,
        }
    }
}

/// Single-threaded runtime handle
pub struct Runtime {
    config: RuntimeConfig,
}

impl Runtime {
    /// Create a runtime with default configuration
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    /// Create a runtime with custom configuration
    pub fn with_config(config: RuntimeConfig) -> Self {
        info!("🚀 bfx runtime ready ({}, timer: {})", config.thread_name, config.enable_timer);
        Self { config }
    }

    /// Drive a future to completion on the current thread
    pub fn block_on<F>(&self, future: F) -> std::io::Result<F::Output>
    where
        F: std::future::Future,
    {
        if self.config.enable_timer {
            let mut runtime = RuntimeBuilder::<FusionDriver>::new().enable_timer().build()?;
            Ok(runtime.block_on(future))
        } else {
            let mut runtime = RuntimeBuilder::<FusionDriver>::new().build()?;
            Ok(runtime.block_on(future))
        }
    }

    /// Get runtime configuration
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a default runtime and block on the future produced by `f`
pub fn run_blocking<F, Fut>(f: F) -> std::io::Result<Fut::Output>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future,
{
    Runtime::new().block_on(f())
}
