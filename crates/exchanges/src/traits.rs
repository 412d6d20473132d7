//! Exchange traits defining the session interface
//!
//! Sessions run on monoio's thread-local executor, so the async methods do
//! not require `Send`.

use crate::errors::Result;
use crate::types::{Balance, Network};
use async_trait::async_trait;
use keyprobe_core::Credentials;

/// A session bound to one exchange endpoint set.
///
/// The owner must call [`ExchangeSession::close`] once it is done; calling it
/// again is a no-op.
#[async_trait(?Send)]
pub trait ExchangeSession {
    /// Get exchange name
    fn name(&self) -> &str;

    /// Endpoint set chosen at construction
    fn network(&self) -> Network;

    /// Fetch and cache market metadata, returning the number of markets
    async fn load_markets(&mut self) -> Result<usize>;

    /// Get server time in milliseconds since Unix epoch
    async fn fetch_time(&self) -> Result<u64>;

    /// Get account balances (requires an API key with read permission)
    async fn fetch_balance(&self) -> Result<Vec<Balance>>;

    /// Release the session's resources
    async fn close(&mut self) -> Result<()>;
}

/// Builds sessions for a given network.
///
/// Construction performs no I/O.
pub trait ExchangeConnector {
    type Session: ExchangeSession;

    fn connect(&self, credentials: &Credentials, network: Network) -> Result<Self::Session>;
}
