//! Binance REST API client using monoio
//!
//! Only the endpoints a connectivity check needs: ping, server time,
//! exchange info and the signed account snapshot.

use crate::binance::auth::{BinanceSigner, API_KEY_HEADER};
use crate::binance::types::{AccountInfo, ApiErrorBody, ExchangeInfo, ServerTime};
use crate::errors::{ExchangeError, Result};
use crate::http::{HttpResponse, MonoioHttpsClient};
use crate::types::Network;
use keyprobe_core::prelude::*;

use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Binance exchange configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinanceConfig {
    pub base_url: String,
    pub testnet: bool,
    pub timeout_ms: u64,
    pub recv_window_ms: u64,
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl BinanceConfig {
    pub fn production() -> Self {
        Self {
            base_url: "https://api.binance.com".to_string(),
            testnet: false,
            timeout_ms: 10_000,
            recv_window_ms: 5_000,
        }
    }

    pub fn testnet() -> Self {
        Self {
            base_url: "https://testnet.binance.vision".to_string(),
            testnet: true,
            ..Self::production()
        }
    }

    pub fn for_network(network: Network) -> Self {
        match network {
            Network::Sandbox => Self::testnet(),
            Network::Production => Self::production(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_recv_window_ms(mut self, recv_window_ms: u64) -> Self {
        self.recv_window_ms = recv_window_ms;
        self
    }

    pub fn network(&self) -> Network {
        Network::from_sandbox_flag(self.testnet)
    }
}

/// Binance REST client
pub struct BinanceRestClient {
    config: BinanceConfig,
    base_url: Url,
    signer: BinanceSigner,
    https_client: MonoioHttpsClient,
}

impl BinanceRestClient {
    /// Create a new Binance REST client. No connection is opened here.
    pub fn new(config: BinanceConfig, signer: BinanceSigner) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        if base_url.scheme() != "https" {
            return Err(ExchangeError::ConfigurationError(format!(
                "Binance base URL must be https: {base_url}"
            )));
        }

        let https_client = MonoioHttpsClient::new(Duration::from_millis(config.timeout_ms))?;

        debug!("🔗 Binance REST client created for {}", base_url);

        Ok(Self {
            config,
            base_url,
            signer,
            https_client,
        })
    }

    pub fn config(&self) -> &BinanceConfig {
        &self.config
    }

    /// Test connectivity (ping endpoint)
    pub async fn ping(&self) -> Result<()> {
        let _response = self.get_request("/api/v3/ping").await?;
        Ok(())
    }

    /// Get server time in milliseconds
    pub async fn server_time(&self) -> Result<u64> {
        let response: ServerTime = self.get_json("/api/v3/time").await?;
        Ok(response.server_time)
    }

    /// Get exchange information
    pub async fn exchange_info(&self) -> Result<ExchangeInfo> {
        let timer = PerfTimer::start("binance_exchange_info");
        let info = self.get_json("/api/v3/exchangeInfo").await?;
        timer.log_elapsed();
        Ok(info)
    }

    /// Get account information (requires authentication)
    pub async fn account_info(&self) -> Result<AccountInfo> {
        let timer = PerfTimer::start("binance_account_info");
        let mut params = BTreeMap::new();
        params.insert("omitZeroBalances", "true".to_string());

        let response = self.signed_request("/api/v3/account", "GET", &params).await?;
        timer.log_elapsed();

        decode(&response)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let response = self.get_request(endpoint).await?;
        decode(&response)
    }

    async fn get_request(&self, endpoint: &str) -> Result<HttpResponse> {
        let mut url = self.base_url.clone();
        url.set_path(endpoint);

        let response = self.https_client.get(url.as_str()).await?;
        check_status(response)
    }

    /// Make a signed request (for authenticated endpoints)
    async fn signed_request(
        &self,
        endpoint: &str,
        method: &str,
        params: &BTreeMap<&str, String>,
    ) -> Result<HttpResponse> {
        let timestamp = nanos() / 1_000_000;
        let query = self.signer.signed_query(params, timestamp, self.config.recv_window_ms)?;

        let mut url = self.base_url.clone();
        url.set_path(endpoint);
        url.set_query(Some(&query));

        debug!("📡 {} {} (signed)", method, endpoint);

        let mut headers = HashMap::new();
        headers.insert(API_KEY_HEADER, self.signer.api_key());

        let response = self.https_client
            .request_with_headers(method, url.as_str(), None, &headers)
            .await?;
        check_status(response)
    }
}

/// Map non-200 responses to errors, preferring Binance's `{code, msg}` document
fn check_status(response: HttpResponse) -> Result<HttpResponse> {
    if response.status == 200 {
        return Ok(response);
    }

    match serde_json::from_str::<ApiErrorBody>(&response.body) {
        Ok(body) => {
            info!("🚫 Binance rejected request: {} ({})", body.msg, body.code);
            Err(ExchangeError::Api {
                status: response.status,
                code: body.code,
                msg: body.msg,
            })
        }
        Err(_) => Err(ExchangeError::HttpError(
            response.status,
            truncate(&response.body, 256).to_string(),
        )),
    }
}

fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T> {
    serde_json::from_str(&response.body).map_err(|e| {
        ExchangeError::SerializationError(format!("{e}: {}", truncate(&response.body, 256)))
    })
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
