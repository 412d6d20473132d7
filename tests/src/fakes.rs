//! Scripted exchange sessions

use async_trait::async_trait;
use keyprobe_core::{Credentials, Timestamp};
use keyprobe_exchanges::{Balance, ExchangeConnector, ExchangeError, ExchangeSession, Network, Result};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// Call counters shared between a connector, its sessions and the test
#[derive(Debug, Default)]
pub struct Probe {
    pub connects: Cell<u32>,
    pub market_loads: Cell<u32>,
    pub time_fetches: Cell<u32>,
    pub balance_fetches: Cell<u32>,
    pub closes: Cell<u32>,
}

impl Probe {
    /// Any call that would have reached the exchange
    pub fn network_calls(&self) -> u32 {
        self.market_loads.get() + self.time_fetches.get() + self.balance_fetches.get()
    }

    fn bump(counter: &Cell<u32>) {
        counter.set(counter.get() + 1);
    }
}

/// What each session call returns
#[derive(Debug, Clone)]
pub struct Script {
    pub market_delay: Duration,
    pub markets: Result<usize>,
    /// `None` answers with the local clock
    pub server_time: Option<Result<u64>>,
    pub balances: Result<Vec<Balance>>,
    pub close: Result<()>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            market_delay: Duration::ZERO,
            markets: Ok(1200),
            server_time: None,
            balances: Ok(Vec::new()),
            close: Ok(()),
        }
    }
}

impl Script {
    pub fn market_delay(mut self, delay: Duration) -> Self {
        self.market_delay = delay;
        self
    }

    pub fn markets(mut self, result: Result<usize>) -> Self {
        self.markets = result;
        self
    }

    pub fn server_time(mut self, result: Result<u64>) -> Self {
        self.server_time = Some(result);
        self
    }

    pub fn balances(mut self, result: Result<Vec<Balance>>) -> Self {
        self.balances = result;
        self
    }

    pub fn close(mut self, result: Result<()>) -> Self {
        self.close = result;
        self
    }
}

pub struct ScriptedSession {
    script: Script,
    network: Network,
    probe: Rc<Probe>,
}

impl ScriptedSession {
    pub fn new(script: Script, network: Network, probe: Rc<Probe>) -> Self {
        Self { script, network, probe }
    }
}

#[async_trait(?Send)]
impl ExchangeSession for ScriptedSession {
    fn name(&self) -> &str {
        "scripted"
    }

    fn network(&self) -> Network {
        self.network
    }

    async fn load_markets(&mut self) -> Result<usize> {
        Probe::bump(&self.probe.market_loads);
        if !self.script.market_delay.is_zero() {
            monoio::time::sleep(self.script.market_delay).await;
        }
        self.script.markets.clone()
    }

    async fn fetch_time(&self) -> Result<u64> {
        Probe::bump(&self.probe.time_fetches);
        match &self.script.server_time {
            Some(result) => result.clone(),
            None => Ok(Timestamp::now().as_millis()),
        }
    }

    async fn fetch_balance(&self) -> Result<Vec<Balance>> {
        Probe::bump(&self.probe.balance_fetches);
        self.script.balances.clone()
    }

    async fn close(&mut self) -> Result<()> {
        Probe::bump(&self.probe.closes);
        tracing::debug!("scripted session closed ({} total)", self.probe.closes.get());
        self.script.close.clone()
    }
}

/// Hands out [`ScriptedSession`]s that all report to one [`Probe`]
pub struct ScriptedConnector {
    script: Script,
    refusal: Option<ExchangeError>,
    probe: Rc<Probe>,
}

impl ScriptedConnector {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            refusal: None,
            probe: Rc::new(Probe::default()),
        }
    }

    /// Fail every `connect` with `err`
    pub fn refusing(err: ExchangeError) -> Self {
        Self {
            refusal: Some(err),
            ..Self::new(Script::default())
        }
    }

    pub fn probe(&self) -> Rc<Probe> {
        self.probe.clone()
    }
}

impl ExchangeConnector for ScriptedConnector {
    type Session = ScriptedSession;

    fn connect(&self, _credentials: &Credentials, network: Network) -> Result<ScriptedSession> {
        Probe::bump(&self.probe.connects);
        if let Some(err) = &self.refusal {
            return Err(err.clone());
        }
        Ok(ScriptedSession::new(self.script.clone(), network, self.probe.clone()))
    }
}
