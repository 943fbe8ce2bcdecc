//! Monoio-native HTTPS transport
//!
//! - Single-threaded async with monoio
//! - rustls with the webpki root set
//! - HTTP/1.1, one connection per request (`Connection: close`)
//! - `Content-Length` and chunked bodies

use crate::errors::{ExchangeError, Result};
use crate::traits::Transport;
use async_trait::async_trait;
use monoio::io::{AsyncReadRent, AsyncWriteRentExt};
use monoio::net::TcpStream;
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection};
use std::io::{Read, Write};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

const USER_AGENT: &str = "bfx-client/0.1";
const READ_CHUNK: usize = 8192;

/// HTTP response
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Response with no headers
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// HTTPS transport with a fixed per-request timeout
///
/// The timeout covers connect, handshake, write and read. The runtime must
/// have timers enabled (`bfx_core::Runtime` does by default).
#[derive(Clone)]
pub struct HttpsTransport {
    tls_config: Arc<ClientConfig>,
    timeout: Duration,
}

impl HttpsTransport {
    /// Create a transport with the webpki root certificates
    pub fn new(timeout: Duration) -> Self {
        let mut root_store = rustls::RootCertStore::empty();
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

        let tls_config = ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        Self {
            tls_config: Arc::new(tls_config),
            timeout,
        }
    }

    /// Configured per-request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn execute(&self, method: &str, url: &Url, headers: &[(&str, &str)]) -> Result<HttpResponse> {
        let request = build_request(method, url, headers)?;
        let exchange = self.round_trip(url, request);

        match monoio::time::timeout(self.timeout, exchange).await {
            Ok(result) => result,
            Err(_) => Err(ExchangeError::Timeout(format!(
                "{method} {} exceeded {}ms",
                url.path(),
                self.timeout.as_millis()
            ))),
        }
    }

    async fn round_trip(&self, url: &Url, request: String) -> Result<HttpResponse> {
        let host = url
            .host_str()
            .ok_or_else(|| ExchangeError::InvalidUrl("No host in URL".to_string()))?;
        let port = url.port_or_known_default().unwrap_or(443);

        let tcp = TcpStream::connect(format!("{host}:{port}"))
            .await
            .map_err(|e| ExchangeError::NetworkError(format!("TCP connect failed: {e}")))?;

        let server_name = ServerName::try_from(host.to_string())
            .map_err(|e| ExchangeError::NetworkError(format!("Invalid server name: {e:?}")))?;
        let tls = ClientConnection::new(self.tls_config.clone(), server_name)
            .map_err(|e| ExchangeError::NetworkError(format!("TLS setup failed: {e}")))?;

        let mut stream = TlsStream { tcp, tls };
        stream.handshake().await?;
        stream.send(request.as_bytes()).await?;
        let raw = stream.read_to_end().await?;

        parse_response(&raw)
    }
}

#[async_trait(?Send)]
impl Transport for HttpsTransport {
    async fn get(&self, url: &Url) -> Result<HttpResponse> {
        debug!("📡 GET {}", url);
        self.execute("GET", url, &[]).await
    }

    async fn post(&self, url: &Url, headers: &[(&str, &str)]) -> Result<HttpResponse> {
        debug!("📡 POST {} (signed)", url);
        self.execute("POST", url, headers).await
    }
}

/// rustls session over a monoio TCP stream
struct TlsStream {
    tcp: TcpStream,
    tls: ClientConnection,
}

impl TlsStream {
    /// Push every pending TLS record to the socket
    async fn flush_tls(&mut self) -> Result<()> {
        while self.tls.wants_write() {
            let mut records = Vec::with_capacity(READ_CHUNK);
            self.tls
                .write_tls(&mut records)
                .map_err(|e| ExchangeError::NetworkError(format!("TLS write failed: {e}")))?;

            if !records.is_empty() {
                let (result, _) = self.tcp.write_all(records).await;
                result.map_err(|e| ExchangeError::NetworkError(format!("TCP write failed: {e}")))?;
            }
        }
        Ok(())
    }

    /// Feed one socket read into the TLS session; 0 means the peer closed
    async fn fill_tls(&mut self) -> Result<usize> {
        let buffer = vec![0u8; READ_CHUNK];
        let (result, buffer) = self.tcp.read(buffer).await;
        let bytes_read = result.map_err(|e| ExchangeError::NetworkError(format!("TCP read failed: {e}")))?;

        if bytes_read == 0 {
            return Ok(0);
        }

        self.tls
            .read_tls(&mut std::io::Cursor::new(&buffer[..bytes_read]))
            .map_err(|e| ExchangeError::NetworkError(format!("TLS read failed: {e}")))?;
        self.tls
            .process_new_packets()
            .map_err(|e| ExchangeError::NetworkError(format!("TLS process failed: {e}")))?;

        Ok(bytes_read)
    }

    async fn handshake(&mut self) -> Result<()> {
        while self.tls.is_handshaking() {
            self.flush_tls().await?;

            if !self.tls.is_handshaking() {
                break;
            }
            if !self.tls.wants_read() {
                return Err(ExchangeError::NetworkError("TLS handshake stalled".to_string()));
            }
            if self.fill_tls().await? == 0 {
                return Err(ExchangeError::NetworkError("Connection closed during handshake".to_string()));
            }
        }
        self.flush_tls().await
    }

    async fn send(&mut self, data: &[u8]) -> Result<()> {
        self.tls
            .writer()
            .write_all(data)
            .map_err(|e| ExchangeError::NetworkError(format!("TLS application write failed: {e}")))?;
        self.flush_tls().await
    }

    async fn read_to_end(&mut self) -> Result<Vec<u8>> {
        let mut response = Vec::new();
        let mut plaintext = [0u8; READ_CHUNK];

        loop {
            loop {
                match self.tls.reader().read(&mut plaintext) {
                    // close_notify
                    Ok(0) => return Ok(response),
                    Ok(n) => response.extend_from_slice(&plaintext[..n]),
                    Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => break,
                    Err(e) => {
                        return Err(ExchangeError::NetworkError(format!("TLS read failed: {e}")));
                    }
                }
            }

            if self.fill_tls().await? == 0 {
                return Ok(response);
            }
        }
    }
}

/// Serialize a bodiless HTTP/1.1 request
pub(crate) fn build_request(method: &str, url: &Url, headers: &[(&str, &str)]) -> Result<String> {
    if url.scheme() != "https" {
        return Err(ExchangeError::InvalidUrl(format!("unsupported scheme '{}'", url.scheme())));
    }
    let host = url
        .host_str()
        .ok_or_else(|| ExchangeError::InvalidUrl("No host in URL".to_string()))?;

    let mut target = url.path().to_string();
    if let Some(query) = url.query() {
        target.push('?');
        target.push_str(query);
    }

    let mut request = format!(
        "{method} {target} HTTP/1.1\r\n\
         Host: {host}\r\n\
         User-Agent: {USER_AGENT}\r\n\
         Accept: application/json\r\n\
         Connection: close\r\n\
         Content-Length: 0\r\n"
    );
    for (key, value) in headers {
        request.push_str(&format!("{key}: {value}\r\n"));
    }
    request.push_str("\r\n");

    Ok(request)
}

/// Parse a complete HTTP/1.1 response read until connection close
pub(crate) fn parse_response(data: &[u8]) -> Result<HttpResponse> {
    let header_end = data
        .windows(4)
        .position(|window| window == b"\r\n\r\n")
        .ok_or_else(|| ExchangeError::NetworkError("Invalid HTTP response: no header terminator".to_string()))?;

    let head = String::from_utf8_lossy(&data[..header_end]);
    let raw_body = &data[header_end + 4..];

    let mut lines = head.lines();
    let status_line = lines
        .next()
        .ok_or_else(|| ExchangeError::NetworkError("Empty response".to_string()))?;
    let status = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse::<u16>().ok())
        .ok_or_else(|| ExchangeError::NetworkError(format!("Invalid status line: {status_line}")))?;

    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect();

    let mut response = HttpResponse {
        status,
        headers,
        body: String::new(),
    };

    let chunked = response
        .header("transfer-encoding")
        .is_some_and(|te| te.to_ascii_lowercase().contains("chunked"));

    let body = if chunked {
        decode_chunked(raw_body)?
    } else if let Some(length) = response.header("content-length").and_then(|v| v.parse::<usize>().ok()) {
        raw_body[..length.min(raw_body.len())].to_vec()
    } else {
        raw_body.to_vec()
    };

    response.body = String::from_utf8_lossy(&body).into_owned();
    Ok(response)
}

/// Decode a `Transfer-Encoding: chunked` body
fn decode_chunked(mut data: &[u8]) -> Result<Vec<u8>> {
    let mut body = Vec::new();

    loop {
        let line_end = data
            .windows(2)
            .position(|window| window == b"\r\n")
            .ok_or_else(|| ExchangeError::NetworkError("Truncated chunk header".to_string()))?;

        let size_line = String::from_utf8_lossy(&data[..line_end]);
        let size_hex = size_line.split(';').next().unwrap_or("").trim();
        let size = usize::from_str_radix(size_hex, 16)
            .map_err(|_| ExchangeError::NetworkError(format!("Invalid chunk size '{size_hex}'")))?;

        data = &data[line_end + 2..];
        if size == 0 {
            return Ok(body);
        }
        if data.len() < size {
            return Err(ExchangeError::NetworkError("Truncated chunk body".to_string()));
        }

        body.extend_from_slice(&data[..size]);
        data = data.get(size + 2..).unwrap_or(&[]);
    }
}
