//! Live checks against the Binance Spot Testnet
//!
//! Ignored by default. Run with testnet keys in the environment (or `.env`):
//!
//! ```bash
//! cargo test -p keyprobe-tests binance_live -- --ignored
//! ```

use keyprobe_core::prelude::*;
use keyprobe_exchanges::binance::{BinanceConfig, BinanceRestClient, BinanceSigner};
use keyprobe_exchanges::{BinanceConnector, ExchangeConnector, ExchangeSession, Network};
use keyprobe_validator::ConnectivityValidator;
use rstest::*;
use serial_test::serial;
use tracing::info;

/// Testnet configuration from the environment; `USE_TESTNET` is ignored
#[fixture]
fn testnet_config() -> Configuration {
    init_logging();
    let loaded = Configuration::from_env().expect("failed to read environment");
    Configuration {
        use_sandbox: true,
        ..loaded
    }
}

#[fixture]
fn credentials(testnet_config: Configuration) -> Credentials {
    testnet_config
        .credentials()
        .expect("BINANCE_API_KEY and BINANCE_API_SECRET must be set for live tests")
}

#[cfg(test)]
mod rest {
    use super::*;

    #[rstest]
    #[ignore = "requires network access to testnet.binance.vision"]
    #[serial]
    #[monoio::test(timer_enabled = true)]
    async fn test_public_endpoints(credentials: Credentials) {
        let client =
            BinanceRestClient::new(BinanceConfig::testnet(), BinanceSigner::new(&credentials))
                .expect("Failed to create REST client");

        client.ping().await.expect("ping failed");

        let server_ms = client.server_time().await.expect("server time failed");
        let drift = Timestamp::now().millis_until(Timestamp::from_millis(server_ms));
        info!("⏰ Testnet time {} (drift {}ms)", Timestamp::from_millis(server_ms), drift);
        assert!(drift.abs() < 60_000);

        let exchange_info = client.exchange_info().await.expect("exchange info failed");
        assert!(exchange_info.symbols.iter().any(|s| s.symbol == "BTCUSDT"));
    }

    #[rstest]
    #[ignore = "requires testnet API keys"]
    #[serial]
    #[monoio::test(timer_enabled = true)]
    async fn test_signed_account_endpoint(credentials: Credentials) {
        let client =
            BinanceRestClient::new(BinanceConfig::testnet(), BinanceSigner::new(&credentials))
                .expect("Failed to create REST client");

        let account = client.account_info().await.expect("account info failed");
        info!("💰 {} balances on the testnet account", account.balances.len());
    }
}

#[cfg(test)]
mod session {
    use super::*;

    #[rstest]
    #[ignore = "requires testnet API keys"]
    #[serial]
    #[monoio::test(timer_enabled = true)]
    async fn test_session_lifecycle(credentials: Credentials) {
        let mut session = BinanceConnector::new()
            .connect(&credentials, Network::Sandbox)
            .expect("connect failed");

        let markets = session.load_markets().await.expect("load_markets failed");
        assert!(markets > 0);
        assert_eq!(session.markets().len(), markets);

        session.fetch_time().await.expect("fetch_time failed");
        session.close().await.expect("close failed");
        assert!(session.is_closed());
    }

    #[rstest]
    #[ignore = "requires testnet API keys"]
    #[serial]
    #[monoio::test(timer_enabled = true)]
    async fn test_full_validation(testnet_config: Configuration) {
        let outcome = ConnectivityValidator::new(BinanceConnector::new())
            .validate(&testnet_config)
            .await;

        for diagnostic in &outcome.diagnostics {
            info!("{diagnostic}");
        }
        assert!(outcome.success, "validation failed: {:?}", outcome.failure);
    }
}
