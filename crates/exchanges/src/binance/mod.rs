//! Binance spot integration
//!
//! [`BinanceExchange`] is the session handed to the validator; it is built by
//! [`BinanceConnector`] for either the production API or the Spot Testnet.

pub mod rest;
pub mod auth;
pub mod types;

use crate::errors::{ExchangeError, Result};
use crate::traits::{ExchangeConnector, ExchangeSession};
use crate::types::{Balance, Network};
use async_trait::async_trait;
use keyprobe_core::Credentials;
use std::collections::HashMap;
use tracing::{debug, info};

// Re-export types from submodules
pub use rest::{BinanceConfig, BinanceRestClient};
pub use auth::BinanceSigner;
pub use types::{AccountInfo, ExchangeInfo, SymbolInfo};

/// Binance session: REST client plus the market cache filled by `load_markets`
pub struct BinanceExchange {
    rest_client: Option<BinanceRestClient>,
    network: Network,
    markets: HashMap<String, SymbolInfo>,
}

impl BinanceExchange {
    /// Create a session; performs no I/O
    pub fn new(config: BinanceConfig, credentials: &Credentials) -> Result<Self> {
        info!("🚀 Initializing Binance session");
        info!("   Base URL: {}", config.base_url);
        info!("   Testnet: {}", config.testnet);

        let network = config.network();
        let signer = BinanceSigner::new(credentials);
        let rest_client = BinanceRestClient::new(config, signer)?;

        Ok(Self {
            rest_client: Some(rest_client),
            network,
            markets: HashMap::new(),
        })
    }

    /// Markets cached by the last successful `load_markets`
    pub fn markets(&self) -> &HashMap<String, SymbolInfo> {
        &self.markets
    }

    pub fn is_closed(&self) -> bool {
        self.rest_client.is_none()
    }

    fn client(&self) -> Result<&BinanceRestClient> {
        self.rest_client.as_ref().ok_or(ExchangeError::SessionClosed)
    }
}

#[async_trait(?Send)]
impl ExchangeSession for BinanceExchange {
    fn name(&self) -> &str {
        "binance"
    }

    fn network(&self) -> Network {
        self.network
    }

    async fn load_markets(&mut self) -> Result<usize> {
        let exchange_info = self.client()?.exchange_info().await?;

        let trading = exchange_info.symbols.iter().filter(|s| s.is_trading()).count();
        debug!("📊 {} symbols, {} trading", exchange_info.symbols.len(), trading);

        self.markets = exchange_info
            .symbols
            .into_iter()
            .map(|symbol| (symbol.symbol.clone(), symbol))
            .collect();

        Ok(self.markets.len())
    }

    async fn fetch_time(&self) -> Result<u64> {
        self.client()?.server_time().await
    }

    async fn fetch_balance(&self) -> Result<Vec<Balance>> {
        let account = self.client()?.account_info().await?;
        account
            .balances
            .into_iter()
            .map(Balance::try_from)
            .collect()
    }

    async fn close(&mut self) -> Result<()> {
        match self.rest_client.take() {
            Some(_) => {
                self.markets.clear();
                debug!("🔒 Binance session closed");
            }
            None => debug!("Binance session already closed"),
        }
        Ok(())
    }
}

/// Builds [`BinanceExchange`] sessions
#[derive(Debug, Clone, Default)]
pub struct BinanceConnector {
    base_url_override: Option<String>,
    timeout_ms: Option<u64>,
}

impl BinanceConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point every session at `base_url` regardless of network
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url_override = Some(base_url.into());
        self
    }

    /// Transport timeout for each request
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn config_for(&self, network: Network) -> BinanceConfig {
        let mut config = BinanceConfig::for_network(network);
        if let Some(base_url) = &self.base_url_override {
            config = config.with_base_url(base_url.clone());
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config = config.with_timeout_ms(timeout_ms);
        }
        config
    }
}

impl ExchangeConnector for BinanceConnector {
    type Session = BinanceExchange;

    fn connect(&self, credentials: &Credentials, network: Network) -> Result<BinanceExchange> {
        BinanceExchange::new(self.config_for(network), credentials)
    }
}
