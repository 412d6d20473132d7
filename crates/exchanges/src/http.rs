//! Monoio-native HTTPS client
//!
//! - Single-threaded async with monoio
//! - Direct TLS integration with rustls
//! - HTTP/1.1 with `Connection: close`, one connection per request
//! - Every request bounded by the client's transport timeout

use crate::errors::{ExchangeError, Result};
use monoio::io::{AsyncReadRent, AsyncWriteRentExt};
use monoio::net::TcpStream;
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection};
use std::collections::HashMap;
use std::io::{Read, Write};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Transport timeout used when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Monoio-native HTTPS client
pub struct MonoioHttpsClient {
    tls_config: Arc<ClientConfig>,
    timeout: Duration,
}

/// HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// TLS stream wrapper for monoio
struct TlsStream {
    stream: TcpStream,
    tls_conn: ClientConnection,
    write_buf: Vec<u8>,
    tls_read_buf: Vec<u8>,
    handshake_complete: bool,
}

impl MonoioHttpsClient {
    /// Create a new HTTPS client with the webpki root store
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            tls_config: default_tls_config(),
            timeout,
        })
    }

    /// Transport timeout applied to each request
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Make an HTTPS GET request
    pub async fn get(&self, url: &str) -> Result<HttpResponse> {
        self.request_with_headers("GET", url, None, &HashMap::new()).await
    }

    /// Make an HTTPS request with custom headers, bounded by the transport timeout
    pub async fn request_with_headers(
        &self,
        method: &str,
        url: &str,
        body: Option<&str>,
        headers: &HashMap<&str, &str>,
    ) -> Result<HttpResponse> {
        match monoio::time::timeout(self.timeout, self.send(method, url, body, headers)).await {
            Ok(result) => result,
            Err(_) => Err(ExchangeError::Timeout(format!(
                "{method} {} exceeded {}ms",
                redact_query(url),
                self.timeout.as_millis()
            ))),
        }
    }

    async fn send(
        &self,
        method: &str,
        url: &str,
        body: Option<&str>,
        headers: &HashMap<&str, &str>,
    ) -> Result<HttpResponse> {
        let parsed_url = url::Url::parse(url)?;

        if parsed_url.scheme() != "https" {
            return Err(ExchangeError::InvalidUrl(format!("Only https is supported: {url}")));
        }

        let host = parsed_url.host_str()
            .ok_or_else(|| ExchangeError::InvalidUrl("No host in URL".to_string()))?;

        let port = parsed_url.port().unwrap_or(443);
        let mut path_and_query = parsed_url.path().to_string();
        if path_and_query.is_empty() {
            path_and_query.push('/');
        }
        if let Some(query) = parsed_url.query() {
            path_and_query.push('?');
            path_and_query.push_str(query);
        }

        // Connect to server
        let tcp_stream = TcpStream::connect(format!("{host}:{port}"))
            .await
            .map_err(|e| ExchangeError::NetworkError(format!("TCP connect to {host}:{port} failed: {e}")))?;

        // Establish TLS connection
        let server_name = ServerName::try_from(host.to_string())
            .map_err(|e| ExchangeError::NetworkError(format!("Invalid server name: {e:?}")))?;

        let tls_conn = ClientConnection::new(self.tls_config.clone(), server_name)
            .map_err(|e| ExchangeError::NetworkError(format!("TLS setup failed: {e}")))?;

        let mut tls_stream = TlsStream::new(tcp_stream, tls_conn);

        let request = build_request(method, host, &path_and_query, body, headers);

        debug!("📡 {} https://{}{}", method, host, parsed_url.path());

        tls_stream.write_all(request.as_bytes()).await?;
        let response_data = tls_stream.read_to_end().await?;

        parse_http_response(&response_data)
    }
}

impl Default for MonoioHttpsClient {
    fn default() -> Self {
        Self {
            tls_config: default_tls_config(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

fn default_tls_config() -> Arc<ClientConfig> {
    let mut root_store = rustls::RootCertStore::empty();
    root_store.extend(
        webpki_roots::TLS_SERVER_ROOTS
            .iter()
            .cloned()
    );

    let tls_config = ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    Arc::new(tls_config)
}

fn build_request(
    method: &str,
    host: &str,
    path_and_query: &str,
    body: Option<&str>,
    headers: &HashMap<&str, &str>,
) -> String {
    let content_length = body.map(|b| b.len()).unwrap_or(0);
    let mut request = format!(
        "{method} {path_and_query} HTTP/1.1\r\n\
         Host: {host}\r\n\
         User-Agent: keyprobe/{}\r\n\
         Accept: application/json\r\n\
         Connection: close\r\n\
         Content-Length: {content_length}\r\n",
        env!("CARGO_PKG_VERSION")
    );

    for (key, value) in headers {
        request.push_str(&format!("{key}: {value}\r\n"));
    }

    request.push_str("\r\n");
    if let Some(body) = body {
        request.push_str(body);
    }
    request
}

/// Parse a complete HTTP/1.1 response, decoding chunked bodies
pub fn parse_http_response(data: &[u8]) -> Result<HttpResponse> {
    let header_end = find(data, b"\r\n\r\n")
        .ok_or_else(|| ExchangeError::NetworkError("Invalid HTTP response: no header terminator".to_string()))?;

    let header_part = String::from_utf8_lossy(&data[..header_end]);
    let body_part = &data[header_end + 4..];

    let mut lines = header_part.lines();

    let status_line = lines.next()
        .ok_or_else(|| ExchangeError::NetworkError("Empty response".to_string()))?;

    let status = status_line.split_whitespace()
        .nth(1)
        .and_then(|s| s.parse::<u16>().ok())
        .ok_or_else(|| ExchangeError::NetworkError(format!("Invalid status line: {status_line}")))?;

    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect();

    let chunked = headers.iter().any(|(key, value)| {
        key.eq_ignore_ascii_case("transfer-encoding") && value.to_ascii_lowercase().contains("chunked")
    });

    let body = if chunked {
        String::from_utf8_lossy(&decode_chunked(body_part)?).into_owned()
    } else {
        String::from_utf8_lossy(body_part).into_owned()
    };

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}

fn decode_chunked(mut data: &[u8]) -> Result<Vec<u8>> {
    let mut body = Vec::with_capacity(data.len());

    loop {
        let line_end = find(data, b"\r\n")
            .ok_or_else(|| ExchangeError::NetworkError("Truncated chunk header".to_string()))?;
        let size_line = String::from_utf8_lossy(&data[..line_end]);
        let size_hex = size_line.split(';').next().unwrap_or_default().trim();
        let size = usize::from_str_radix(size_hex, 16)
            .map_err(|_| ExchangeError::NetworkError(format!("Invalid chunk size: {size_hex:?}")))?;

        data = &data[line_end + 2..];
        if size == 0 {
            break;
        }
        if data.len() < size {
            return Err(ExchangeError::NetworkError(format!(
                "Truncated chunk: expected {size} bytes, got {}",
                data.len()
            )));
        }

        body.extend_from_slice(&data[..size]);
        data = &data[size..];
        data = data.strip_prefix(b"\r\n").unwrap_or(data);
    }

    Ok(body)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|window| window == needle)
}

/// Drop the query string so signatures never reach the logs
fn redact_query(url: &str) -> &str {
    url.split_once('?').map(|(base, _)| base).unwrap_or(url)
}

impl TlsStream {
    fn new(stream: TcpStream, tls_conn: ClientConnection) -> Self {
        Self {
            stream,
            tls_conn,
            write_buf: Vec::with_capacity(8192),
            tls_read_buf: Vec::with_capacity(8192),
            handshake_complete: false,
        }
    }

    /// Complete TLS handshake
    async fn complete_handshake(&mut self) -> Result<()> {
        if self.handshake_complete {
            return Ok(());
        }

        loop {
            while self.tls_conn.wants_write() {
                self.flush_tls().await?;
            }

            if !self.tls_conn.is_handshaking() {
                self.handshake_complete = true;
                break;
            }

            if self.tls_conn.wants_read() {
                let buffer = vec![0u8; 4096];
                let (result, buf) = self.stream.read(buffer).await;
                let bytes_read = result.map_err(|e| ExchangeError::NetworkError(format!("TCP read failed: {e}")))?;

                if bytes_read == 0 {
                    return Err(ExchangeError::NetworkError("Connection closed during handshake".to_string()));
                }

                self.tls_conn.read_tls(&mut std::io::Cursor::new(&buf[..bytes_read]))
                    .map_err(|e| ExchangeError::NetworkError(format!("TLS read failed: {e}")))?;

                self.tls_conn.process_new_packets()
                    .map_err(|e| ExchangeError::NetworkError(format!("TLS handshake failed: {e}")))?;
            } else if !self.tls_conn.wants_write() {
                return Err(ExchangeError::NetworkError("TLS handshake stalled".to_string()));
            }
        }

        Ok(())
    }

    /// Move pending TLS records onto the socket
    async fn flush_tls(&mut self) -> Result<()> {
        self.write_buf.clear();

        let tls_bytes = self.tls_conn.write_tls(&mut self.write_buf)
            .map_err(|e| ExchangeError::NetworkError(format!("TLS write failed: {e}")))?;

        if tls_bytes > 0 {
            let (result, _) = self.stream.write_all(self.write_buf.clone()).await;
            result.map_err(|e| ExchangeError::NetworkError(format!("TCP write failed: {e}")))?;
        }
        Ok(())
    }

    async fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.complete_handshake().await?;

        self.tls_conn.writer().write_all(data)
            .map_err(|e| ExchangeError::NetworkError(format!("TLS application write failed: {e}")))?;

        while self.tls_conn.wants_write() {
            self.flush_tls().await?;
        }

        Ok(())
    }

    async fn read_to_end(&mut self) -> Result<Vec<u8>> {
        self.complete_handshake().await?;

        let mut response_data = Vec::new();
        let mut tcp_buffer = vec![0u8; 4096];

        loop {
            self.tls_read_buf.clear();
            self.tls_read_buf.resize(4096, 0);

            match self.tls_conn.reader().read(&mut self.tls_read_buf) {
                Ok(0) => {}
                Ok(n) => {
                    response_data.extend_from_slice(&self.tls_read_buf[..n]);
                    continue;
                }
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {}
                // Peer closed without close_notify; the body is already complete with Connection: close
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
                Err(e) => {
                    return Err(ExchangeError::NetworkError(format!("TLS read failed: {e}")));
                }
            }

            let (result, buf) = self.stream.read(tcp_buffer).await;
            let bytes_read = result.map_err(|e| ExchangeError::NetworkError(format!("TCP read failed: {e}")))?;

            if bytes_read == 0 {
                break;
            }

            let mut cursor = std::io::Cursor::new(&buf[..bytes_read]);
            self.tls_conn.read_tls(&mut cursor)
                .map_err(|e| ExchangeError::NetworkError(format!("TLS read failed: {e}")))?;

            self.tls_conn.process_new_packets()
                .map_err(|e| ExchangeError::NetworkError(format!("TLS process failed: {e}")))?;

            tcp_buffer = vec![0u8; 4096];
        }

        Ok(response_data)
    }
}
