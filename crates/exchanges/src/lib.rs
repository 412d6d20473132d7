//! # keyprobe exchange sessions
//!
//! Exchange access for the connectivity validator.
//!
//! ## Architecture
//!
//! - **monoio-based HTTPS client** - single-threaded async, rustls for TLS
//! - **Session trait** - what a validation run may do with an exchange
//! - **Connector trait** - builds a session for sandbox or production
//! - **Binance** - the spot REST API and its Spot Testnet

pub mod binance;
pub mod traits;
pub mod types;
pub mod errors;
pub mod http;

// Re-export main types
pub use binance::{BinanceConnector, BinanceExchange};
pub use traits::{ExchangeConnector, ExchangeSession};
pub use types::*;
pub use errors::{ExchangeError, Result};
pub use http::MonoioHttpsClient;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::binance::{BinanceConnector, BinanceExchange};
    pub use crate::traits::{ExchangeConnector, ExchangeSession};
    pub use crate::types::*;
    pub use crate::errors::{ExchangeError, Result};
    pub use keyprobe_core::prelude::*;
}
