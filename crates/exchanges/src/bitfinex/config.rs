//! Client configuration
//!
//! One explicit object handed to each client constructor. Defaults are
//! resolved per call from the client's own copy, so two clients with
//! different pairs or keys can live in one process.

use crate::bitfinex::auth::Credentials;
use crate::errors::{ExchangeError, Result};
use crate::types::TradingPair;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Bitfinex REST base URL
pub const BITFINEX_BASE_URL: &str = "https://api.bitfinex.com";

/// Per-request timeout
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Bitfinex client configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    pub api_key: String,
    pub api_secret: String,
    pub base_url: String,
    pub timeout_ms: u64,
    pub default_pair: TradingPair,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_secret: String::new(),
            base_url: BITFINEX_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            default_pair: TradingPair::new("btc", "usd"),
        }
    }
}

impl ExchangeConfig {
    /// Build from `BFX_*` environment variables; unset ones keep defaults
    ///
    /// Credentials are optional here so public-only clients can be built
    /// from the same environment.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let (Ok(key), Ok(secret)) = (std::env::var("BFX_API_KEY"), std::env::var("BFX_API_SECRET")) {
            config = config.with_credentials(key, secret);
        }
        if let Ok(base) = std::env::var("BFX_PAIR_BASE") {
            config.default_pair.base = base;
        }
        if let Ok(quote) = std::env::var("BFX_PAIR_QUOTE") {
            config.default_pair.quote = quote;
        }
        if let Ok(url) = std::env::var("BFX_BASE_URL") {
            config.base_url = url;
        }
        if let Ok(raw) = std::env::var("BFX_TIMEOUT_MS") {
            config.timeout_ms = raw
                .parse()
                .map_err(|_| ExchangeError::ConfigurationError(format!("BFX_TIMEOUT_MS is not an integer: '{raw}'")))?;
        }

        Ok(config)
    }

    pub fn with_credentials(mut self, api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self.api_secret = api_secret.into();
        self
    }

    /// Require `BFX_API_KEY`/`BFX_API_SECRET`
    pub fn with_env_credentials(mut self) -> Result<Self> {
        self.api_key = std::env::var("BFX_API_KEY")
            .map_err(|_| ExchangeError::MissingCredentials("BFX_API_KEY".to_string()))?;
        self.api_secret = std::env::var("BFX_API_SECRET")
            .map_err(|_| ExchangeError::MissingCredentials("BFX_API_SECRET".to_string()))?;
        Ok(self)
    }

    pub fn with_default_pair(mut self, pair: TradingPair) -> Self {
        self.default_pair = pair;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn has_credentials(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty()
    }

    /// Credentials for the trading client
    pub fn credentials(&self) -> Result<Credentials> {
        if self.api_key.is_empty() {
            return Err(ExchangeError::MissingCredentials("api_key".to_string()));
        }
        if self.api_secret.is_empty() {
            return Err(ExchangeError::MissingCredentials("api_secret".to_string()));
        }
        Ok(Credentials::new(self.api_key.clone(), self.api_secret.clone()))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl std::fmt::Debug for ExchangeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeConfig")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .field("default_pair", &self.default_pair)
            .finish()
    }
}
