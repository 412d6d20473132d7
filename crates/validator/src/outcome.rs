//! Validation result types

use keyprobe_core::LogLevel;
use serde::Serialize;

/// Hints printed after a market-load timeout
pub const NETWORK_HINTS: [&str; 3] = [
    "1. Check that the network connection is up",
    "2. Check whether a proxy is required or misconfigured",
    "3. Check firewall rules for outbound HTTPS to the exchange",
];

/// Hints printed after any other mandatory-step failure
pub const GENERIC_HINTS: [&str; 3] = [
    "1. Check that the API key and secret are correct",
    "2. Check that the network connection is up",
    "3. When using the sandbox, make sure the keys were issued by the testnet (production keys do not work there, and vice versa)",
];

/// One leveled, human-readable message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub level: LogLevel,
    pub message: String,
}

impl Diagnostic {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}

/// Why a run failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    ConfigurationMissing,
    SessionConstruction,
    Timeout,
    Generic,
}

/// Result of one validation run
#[derive(Debug, Clone, Serialize)]
pub struct ValidationOutcome {
    pub run_id: String,
    pub success: bool,
    pub failure: Option<FailureKind>,
    pub diagnostics: Vec<Diagnostic>,
    /// Remediation hints, also present in `diagnostics`
    pub remediation: Vec<String>,
}

impl ValidationOutcome {
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.at_level(LogLevel::Warn)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.at_level(LogLevel::Error)
    }

    /// Whether any diagnostic message contains `needle`
    pub fn mentions(&self, needle: &str) -> bool {
        self.diagnostics.iter().any(|d| d.message.contains(needle))
    }

    fn at_level(&self, level: LogLevel) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.level == level)
    }
}
