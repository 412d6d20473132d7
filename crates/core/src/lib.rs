//! # keyprobe core
//!
//! Shared building blocks for the keyprobe connectivity validator.
//!
//! ## Contents
//!
//! 1. **Configuration** - sandbox flag and API credentials, read once from the environment
//! 2. **Timing** - nanosecond timestamps and step timers
//! 3. **Logging** - one-time tracing subscriber setup
//! 4. **ID generation** - nanoid based run identifiers

pub mod config;
pub mod timing;
pub mod logging;
pub mod id_gen;

// Re-export commonly used items
pub use config::{ConfigError, ConfigProvider, Configuration, Credentials};
pub use timing::{nanos, PerfTimer, Timestamp};
pub use logging::{init_logging, LogLevel};
pub use id_gen::{generate_id_with_prefix, RunId};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{ConfigProvider, Configuration, Credentials};
    pub use crate::timing::{nanos, PerfTimer, Timestamp};
    pub use crate::id_gen::{generate_id_with_prefix, RunId};
    pub use crate::logging::{init_logging, LogLevel};

    // Common external types
    pub use serde::{Deserialize, Serialize};
    pub use chrono::{DateTime, Utc};
}
