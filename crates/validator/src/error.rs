//! Validation errors
//!
//! Only failures of mandatory steps appear here. The balance step absorbs
//! its own errors.

use crate::outcome::FailureKind;
use keyprobe_exchanges::ExchangeError;
use std::time::Duration;
use thiserror::Error;

/// Mandatory validation steps, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    LoadMarkets,
    FetchTime,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::LoadMarkets => write!(f, "market metadata load"),
            Step::FetchTime => write!(f, "server time fetch"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("API credentials missing: {}", missing.join(", "))]
    ConfigurationMissing { missing: Vec<&'static str> },

    #[error("Could not construct exchange session: {0}")]
    SessionConstruction(#[source] ExchangeError),

    #[error("{step} timed out after {}s", after.as_secs_f64())]
    Timeout { step: Step, after: Duration },

    #[error("{step} failed: {source}")]
    Step {
        step: Step,
        #[source]
        source: ExchangeError,
    },
}

impl ValidationError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ValidationError::ConfigurationMissing { .. } => FailureKind::ConfigurationMissing,
            ValidationError::SessionConstruction(_) => FailureKind::SessionConstruction,
            ValidationError::Timeout { .. } => FailureKind::Timeout,
            ValidationError::Step { .. } => FailureKind::Generic,
        }
    }
}
