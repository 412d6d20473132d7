//! Timestamps and step timers
//!
//! Wall-clock timestamps with nanosecond resolution, used to compare the
//! exchange clock against the local one and to time each validation step.

use std::time::{SystemTime, UNIX_EPOCH};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wall-clock timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp {
    /// Nanoseconds since Unix epoch
    pub nanos: u64,
}

impl Timestamp {
    /// Create a timestamp from milliseconds since Unix epoch, the unit exchanges report
    pub fn from_millis(millis: u64) -> Self {
        Self {
            nanos: millis.saturating_mul(1_000_000),
        }
    }

    /// Create a timestamp from the current time
    pub fn now() -> Self {
        Self {
            nanos: nanos(),
        }
    }

    /// Milliseconds since Unix epoch
    pub fn as_millis(&self) -> u64 {
        self.nanos / 1_000_000
    }

    /// Convert to chrono DateTime<Utc>
    pub fn to_datetime(&self) -> DateTime<Utc> {
        let secs = self.nanos / 1_000_000_000;
        let nsecs = (self.nanos % 1_000_000_000) as u32;
        DateTime::from_timestamp(secs as i64, nsecs).unwrap_or_else(Utc::now)
    }

    /// Signed distance to `other` in milliseconds (`other - self`)
    pub fn millis_until(&self, other: Timestamp) -> i64 {
        other.as_millis() as i64 - self.as_millis() as i64
    }

    /// Get elapsed time since this timestamp in nanoseconds
    pub fn elapsed_nanos(&self) -> u64 {
        nanos().saturating_sub(self.nanos)
    }

    /// Get elapsed time since this timestamp in microseconds
    pub fn elapsed_micros(&self) -> u64 {
        self.elapsed_nanos() / 1_000
    }

    /// Get elapsed time since this timestamp in milliseconds
    pub fn elapsed_millis(&self) -> u64 {
        self.elapsed_nanos() / 1_000_000
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_datetime().format("%Y-%m-%d %H:%M:%S%.3f UTC"))
    }
}

/// Current wall-clock time in nanoseconds since Unix epoch
#[inline]
pub fn nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}

/// Named timer for one operation
pub struct PerfTimer {
    start: Timestamp,
    name: String,
}

impl PerfTimer {
    /// Start a new timer
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            start: Timestamp::now(),
            name: name.into(),
        }
    }

    /// Get elapsed time in microseconds
    pub fn elapsed_micros(&self) -> u64 {
        self.start.elapsed_micros()
    }

    /// Get elapsed time in milliseconds
    pub fn elapsed_millis(&self) -> u64 {
        self.start.elapsed_millis()
    }

    /// Log the elapsed time at debug level
    pub fn log_elapsed(&self) {
        let micros = self.elapsed_micros();
        if micros < 1000 {
            tracing::debug!("⏱️  {} took {}μs", self.name, micros);
        } else {
            tracing::debug!("⏱️  {} took {:.3}ms", self.name, micros as f64 / 1000.0);
        }
    }
}
