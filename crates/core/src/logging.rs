//! Unified logging integration
//!
//! Every diagnostic the validator produces is emitted through `tracing`;
//! this module installs the subscriber that turns those events into
//! console lines.

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

static INIT: Once = Once::new();

/// Initialize the tracing subscriber once per process.
///
/// The filter defaults to `info` and can be overridden with `RUST_LOG`.
/// Later calls are no-ops, and an already installed global subscriber
/// (for example one set up by a test harness) is left in place.
pub fn init_logging() {
    INIT.call_once(|| {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info"))
            )
            .with_target(false)
            .finish();

        if tracing::subscriber::set_global_default(subscriber).is_ok() {
            tracing::debug!("📝 Initialized tracing logging");
        }
    });
}

/// Log level of a single diagnostic line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// Emit `$message` through tracing at a runtime-selected [`LogLevel`]
#[macro_export]
macro_rules! log_at {
    ($level:expr, $run:expr, $message:expr) => {
        match $level {
            $crate::logging::LogLevel::Info => tracing::info!(run = %$run, "{}", $message),
            $crate::logging::LogLevel::Warn => tracing::warn!(run = %$run, "{}", $message),
            $crate::logging::LogLevel::Error => tracing::error!(run = %$run, "{}", $message),
        }
    };
}
