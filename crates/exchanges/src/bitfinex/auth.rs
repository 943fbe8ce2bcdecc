//! Bitfinex v1 request signing
//!
//! An authenticated call carries no body and no query string. Its parameters
//! travel as a base64 JSON payload in `X-BFX-PAYLOAD`, authenticated by an
//! HMAC-SHA384 of that payload in `X-BFX-SIGNATURE`:
//!
//! 1. build `{ request, nonce, ..params }` (a new object, caller's params untouched)
//! 2. serialize to compact JSON with sorted keys
//! 3. payload = base64(json)
//! 4. signature = hex(HMAC-SHA384(secret, payload))

use crate::errors::{ExchangeError, Result};
use bfx_core::NonceGenerator;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use serde::Serialize;
use serde_json::{Map, Value};
use sha2::Sha384;
use tracing::debug;

type HmacSha384 = Hmac<Sha384>;

pub const API_KEY_HEADER: &str = "X-BFX-APIKEY";
pub const PAYLOAD_HEADER: &str = "X-BFX-PAYLOAD";
pub const SIGNATURE_HEADER: &str = "X-BFX-SIGNATURE";

/// Bitfinex API credentials
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub secret_key: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Both halves present
    pub fn is_valid(&self) -> bool {
        !self.api_key.is_empty() && !self.secret_key.is_empty()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Header set proving identity and integrity of one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub api_key: String,
    pub payload: String,
    pub signature: String,
}

impl SignedHeaders {
    /// `(name, value)` pairs ready for the transport
    pub fn as_pairs(&self) -> [(&'static str, &str); 3] {
        [
            (API_KEY_HEADER, self.api_key.as_str()),
            (PAYLOAD_HEADER, self.payload.as_str()),
            (SIGNATURE_HEADER, self.signature.as_str()),
        ]
    }
}

/// Signs authenticated calls for one credential pair
pub struct RequestSigner {
    credentials: Credentials,
    nonces: NonceGenerator,
}

impl RequestSigner {
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_nonces(credentials, NonceGenerator::new())
    }

    /// Use a prepared nonce source, e.g. one floored above nonces an
    /// earlier process already spent on this key
    pub fn with_nonces(credentials: Credentials, nonces: NonceGenerator) -> Result<Self> {
        if !credentials.is_valid() {
            return Err(ExchangeError::InvalidCredentials);
        }
        Ok(Self { credentials, nonces })
    }

    pub fn api_key(&self) -> &str {
        &self.credentials.api_key
    }

    /// Sign `params` for the API path `request` with a fresh nonce
    pub fn sign<P: Serialize + ?Sized>(&self, request: &str, params: &P) -> Result<SignedHeaders> {
        // Serialization failures must surface before a nonce is spent.
        let params = params_object(params)?;
        let body = with_envelope(params, request, self.nonces.next());
        self.sign_body(&body)
    }

    /// Sign with a caller-chosen nonce; same inputs, same headers
    pub fn sign_with_nonce<P: Serialize + ?Sized>(
        &self,
        request: &str,
        params: &P,
        nonce: u64,
    ) -> Result<SignedHeaders> {
        let params = params_object(params)?;
        self.sign_body(&with_envelope(params, request, nonce))
    }

    fn sign_body(&self, body: &Map<String, Value>) -> Result<SignedHeaders> {
        let json = serde_json::to_string(body)
            .map_err(|e| ExchangeError::SerializationError(e.to_string()))?;
        let payload = STANDARD.encode(json.as_bytes());
        let signature = self.create_signature(&payload)?;

        let request = body.get("request").and_then(serde_json::Value::as_str).unwrap_or("?");
        debug!("🔐 Signed {}", request);

        Ok(SignedHeaders {
            api_key: self.credentials.api_key.clone(),
            payload,
            signature,
        })
    }

    fn mac(&self) -> Result<HmacSha384> {
        HmacSha384::new_from_slice(self.credentials.secret_key.as_bytes())
            .map_err(|e| ExchangeError::SigningError(format!("HMAC setup failed: {e}")))
    }

    fn create_signature(&self, payload: &str) -> Result<String> {
        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Check a hex `signature` against `payload` in constant time
    pub fn verify(&self, payload: &str, signature: &str) -> bool {
        let (Ok(mut mac), Ok(expected)) = (self.mac(), hex::decode(signature)) else {
            return false;
        };
        mac.update(payload.as_bytes());
        mac.verify_slice(&expected).is_ok()
    }
}

/// Decode an `X-BFX-PAYLOAD` value back into its JSON object
pub fn decode_payload(payload: &str) -> Result<Value> {
    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| ExchangeError::DataFormatError(format!("payload is not base64: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| ExchangeError::DataFormatError(format!("payload is not JSON: {e}")))
}

/// Serialize `params` into a flat JSON object of scalars
fn params_object<P: Serialize + ?Sized>(params: &P) -> Result<Map<String, Value>> {
    let value = serde_json::to_value(params)
        .map_err(|e| ExchangeError::SerializationError(e.to_string()))?;

    let map = match value {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            return Err(ExchangeError::SerializationError(format!(
                "parameters must form a JSON object, got {other}"
            )));
        }
    };

    if let Some((key, _)) = map.iter().find(|(_, v)| v.is_object() || v.is_array()) {
        return Err(ExchangeError::SerializationError(format!(
            "parameter '{key}' is not a scalar"
        )));
    }

    Ok(map)
}

/// `request` and `nonce` overwrite any same-named parameter
fn with_envelope(mut params: Map<String, Value>, request: &str, nonce: u64) -> Map<String, Value> {
    params.insert("request".to_string(), Value::String(request.to_string()));
    params.insert("nonce".to_string(), Value::String(nonce.to_string()));
    params
}
