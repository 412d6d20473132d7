//! Connectivity validation flow
//!
//! One run walks a fixed chain of steps:
//!
//! 1. credential presence check (no I/O)
//! 2. session construction (no I/O)
//! 3. market metadata load, bounded by [`ValidatorSettings::market_load_timeout`]
//! 4. server time fetch
//! 5. balance fetch, best-effort
//! 6. session release
//!
//! Steps 1-4 are mandatory and short-circuit on the first error. Step 5
//! only ever adds warnings. Once a session exists it is released exactly
//! once, whatever happened in between.

use crate::error::{Step, ValidationError};
use crate::outcome::{ValidationOutcome, GENERIC_HINTS, NETWORK_HINTS};
use crate::report::Report;
use keyprobe_core::prelude::*;
use keyprobe_exchanges::{Balance, ExchangeConnector, ExchangeError, ExchangeSession, Network};
use std::time::Duration;

/// How many non-zero balances are listed individually
const LISTED_BALANCES: usize = 5;

/// Tunables for a validation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorSettings {
    /// Deadline for the market metadata load
    pub market_load_timeout: Duration,
    /// Local vs exchange clock difference above which a warning is emitted
    pub max_clock_drift: Duration,
}

impl ValidatorSettings {
    pub const MARKET_LOAD_TIMEOUT: Duration = Duration::from_secs(30);
    pub const MAX_CLOCK_DRIFT: Duration = Duration::from_millis(1000);
}

impl Default for ValidatorSettings {
    fn default() -> Self {
        Self {
            market_load_timeout: Self::MARKET_LOAD_TIMEOUT,
            max_clock_drift: Self::MAX_CLOCK_DRIFT,
        }
    }
}

/// Runs the validation chain against sessions built by `C`
pub struct ConnectivityValidator<C> {
    connector: C,
    settings: ValidatorSettings,
}

impl<C: ExchangeConnector> ConnectivityValidator<C> {
    pub fn new(connector: C) -> Self {
        Self::with_settings(connector, ValidatorSettings::default())
    }

    pub fn with_settings(connector: C, settings: ValidatorSettings) -> Self {
        Self { connector, settings }
    }

    pub fn settings(&self) -> &ValidatorSettings {
        &self.settings
    }

    /// Perform one validation pass for `config`.
    ///
    /// Never fails: every problem ends up in the outcome's diagnostics.
    pub async fn validate<P>(&self, config: &P) -> ValidationOutcome
    where
        P: ConfigProvider + ?Sized,
    {
        let mut report = Report::new(RunId::new());
        describe_configuration(config, &mut report);

        let network = Network::from_sandbox_flag(config.use_sandbox());
        match self.run(config, network, &mut report).await {
            Ok(()) => {
                summarize_success(network, &mut report);
                report.finish(None)
            }
            Err(err) => {
                let kind = err.kind();
                report_failure(&err, &mut report);
                report.finish(Some(kind))
            }
        }
    }

    async fn run<P>(
        &self,
        config: &P,
        network: Network,
        report: &mut Report,
    ) -> Result<(), ValidationError>
    where
        P: ConfigProvider + ?Sized,
    {
        let credentials = check_credentials(config)?;

        let mut session = self
            .connector
            .connect(&credentials, network)
            .map_err(ValidationError::SessionConstruction)?;

        report.info(format!("🔗 Testing connection to {} ({network})...", session.name()));

        let result = self.exercise(&mut session, report).await;
        release(&mut session, report).await;
        result
    }

    async fn exercise(
        &self,
        session: &mut C::Session,
        report: &mut Report,
    ) -> Result<(), ValidationError> {
        load_markets(session, self.settings.market_load_timeout, report).await?;
        fetch_server_time(session, self.settings.max_clock_drift, report).await?;
        fetch_balance(session, report).await;
        Ok(())
    }
}

fn describe_configuration<P: ConfigProvider + ?Sized>(config: &P, report: &mut Report) {
    report.info(format!("USE_TESTNET: {}", config.use_sandbox()));
    report.info(match config.masked_api_key() {
        Some(masked) => format!("API key: {masked}"),
        None => "API key: not set".to_string(),
    });
    report.info(if config.api_secret().is_some() {
        "API secret: set"
    } else {
        "API secret: not set"
    });

    if config.use_sandbox() {
        report.info("🔧 Configured for the sandbox network (testnet)");
    } else {
        report.info("🌐 Configured for the production network");
    }
}

fn check_credentials<P: ConfigProvider + ?Sized>(config: &P) -> Result<Credentials, ValidationError> {
    config.credentials().ok_or_else(|| ValidationError::ConfigurationMissing {
        missing: config.missing_credentials(),
    })
}

async fn load_markets<S: ExchangeSession>(
    session: &mut S,
    deadline: Duration,
    report: &mut Report,
) -> Result<(), ValidationError> {
    let timer = PerfTimer::start("load_markets");

    let count = match monoio::time::timeout(deadline, session.load_markets()).await {
        Ok(Ok(count)) => count,
        Ok(Err(source)) => {
            let waited = Duration::from_millis(timer.elapsed_millis());
            return Err(market_load_failure(source, waited));
        }
        Err(_) => {
            return Err(ValidationError::Timeout {
                step: Step::LoadMarkets,
                after: deadline,
            })
        }
    };

    report.info(format!(
        "✅ Market metadata loaded: {count} markets in {}ms",
        timer.elapsed_millis()
    ));
    timer.log_elapsed();
    Ok(())
}

/// Transport timeouts during the market load count as the step timing out;
/// they usually fire before the step deadline does.
fn market_load_failure(source: ExchangeError, waited: Duration) -> ValidationError {
    match source {
        ExchangeError::Timeout(detail) => {
            tracing::debug!("market load transport timeout: {detail}");
            ValidationError::Timeout {
                step: Step::LoadMarkets,
                after: waited,
            }
        }
        source => ValidationError::Step {
            step: Step::LoadMarkets,
            source,
        },
    }
}

async fn fetch_server_time<S: ExchangeSession>(
    session: &S,
    max_drift: Duration,
    report: &mut Report,
) -> Result<(), ValidationError> {
    let server_ms = session.fetch_time().await.map_err(|source| ValidationError::Step {
        step: Step::FetchTime,
        source,
    })?;

    let server_time = Timestamp::from_millis(server_ms);
    report.info(format!("✅ Connected! Server time: {server_ms} ({server_time})"));

    let drift_ms = Timestamp::now().millis_until(server_time);
    if drift_ms.unsigned_abs() > max_drift.as_millis() as u64 {
        report.warn(format!(
            "⚠️ Local clock differs from the exchange by {drift_ms}ms; signed requests may be rejected, consider syncing the system clock"
        ));
    } else {
        report.info(format!("✅ Clock drift: {drift_ms}ms"));
    }
    Ok(())
}

async fn fetch_balance<S: ExchangeSession>(session: &S, report: &mut Report) {
    match session.fetch_balance().await {
        Ok(balances) => summarize_balances(&balances, report),
        Err(err) if err.is_permission_denied() => {
            report.warn(format!(
                "⚠️ Balance fetch failed, the API key may lack read permission: {err}"
            ));
        }
        Err(err) => {
            report.warn(format!("⚠️ Balance fetch failed (possibly a permission issue): {err}"));
        }
    }
}

fn summarize_balances(balances: &[Balance], report: &mut Report) {
    let held: Vec<&Balance> = balances.iter().filter(|b| !b.is_zero()).collect();
    report.info(format!("✅ Balance fetched: {} assets with non-zero holdings", held.len()));

    for balance in held.iter().take(LISTED_BALANCES) {
        report.info(format!(
            "   {}: {} (locked: {})",
            balance.asset, balance.free, balance.locked
        ));
    }
    if held.len() > LISTED_BALANCES {
        report.info(format!("   ... and {} more", held.len() - LISTED_BALANCES));
    }
}

async fn release<S: ExchangeSession>(session: &mut S, report: &mut Report) {
    if let Err(err) = session.close().await {
        report.warn(format!("⚠️ Failed to release the exchange session cleanly: {err}"));
    }
}

fn summarize_success(network: Network, report: &mut Report) {
    match network {
        Network::Sandbox => {
            report.info("🎉 Sandbox configuration validated!");
            report.info("💡 You are on the sandbox network; all trades are simulated");
        }
        Network::Production => {
            report.info("🎉 Production configuration validated!");
            report.warn("⚠️ You are on the production network; orders move real funds, proceed with care");
        }
    }
}

fn report_failure(err: &ValidationError, report: &mut Report) {
    match err {
        ValidationError::ConfigurationMissing { .. } => {
            report.error(format!(
                "❌ {err}; set BINANCE_API_KEY and BINANCE_API_SECRET in the environment or .env"
            ));
        }
        ValidationError::Timeout { .. } => {
            report.error(format!("❌ Connection timed out: {err}, possibly a network problem"));
            report.remediation(&NETWORK_HINTS);
        }
        ValidationError::SessionConstruction(_) | ValidationError::Step { .. } => {
            report.error(format!("❌ Connection failed: {err}"));
            report.remediation(&GENERIC_HINTS);
        }
    }
}
