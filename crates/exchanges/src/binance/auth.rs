//! Binance request signing
//!
//! Signed endpoints take an HMAC-SHA256 signature (hex) over the exact query
//! string sent, with `timestamp` and `recvWindow` included.

use crate::errors::{ExchangeError, Result};
use hmac::{Hmac, Mac};
use keyprobe_core::Credentials;
use sha2::Sha256;
use std::collections::BTreeMap;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the API key on authenticated requests
pub const API_KEY_HEADER: &str = "X-MBX-APIKEY";

/// Binance request signer
#[derive(Clone)]
pub struct BinanceSigner {
    api_key: String,
    secret_key: String,
}

impl BinanceSigner {
    /// Create a signer from validated credentials
    pub fn new(credentials: &Credentials) -> Self {
        Self {
            api_key: credentials.api_key().to_string(),
            secret_key: credentials.api_secret().to_string(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Create HMAC-SHA256 signature
    pub fn sign(&self, payload: &str) -> Result<String> {
        let mut mac = HmacSha256::new_from_slice(self.secret_key.as_bytes())
            .map_err(|e| ExchangeError::SigningError(format!("HMAC setup failed: {e}")))?;

        mac.update(payload.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Build the signed query string: sorted parameters plus timing fields, then `signature`
    pub fn signed_query(
        &self,
        params: &BTreeMap<&str, String>,
        timestamp_ms: u64,
        recv_window_ms: u64,
    ) -> Result<String> {
        let mut all = params.clone();
        all.insert("timestamp", timestamp_ms.to_string());
        all.insert("recvWindow", recv_window_ms.to_string());

        let query = build_query_string(&all);
        let signature = self.sign(&query)?;
        Ok(format!("{query}&signature={signature}"))
    }
}

impl std::fmt::Debug for BinanceSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinanceSigner")
            .field("api_key", &format!("{}...", self.api_key.chars().take(8).collect::<String>()))
            .finish_non_exhaustive()
    }
}

/// Build query string from parameters in key order
pub fn build_query_string(params: &BTreeMap<&str, String>) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
