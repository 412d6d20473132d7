//! # keyprobe validator
//!
//! One-shot check that an exchange account is reachable with the configured
//! credentials: loads market metadata under a deadline, fetches the server
//! time and, best-effort, the account balance. Every step is reported as a
//! leveled diagnostic and the run ends in a single pass/fail outcome.

pub mod error;
pub mod outcome;
mod report;
pub mod usage;
pub mod validator;

pub use error::{Step, ValidationError};
pub use outcome::{Diagnostic, FailureKind, ValidationOutcome, GENERIC_HINTS, NETWORK_HINTS};
pub use usage::USAGE;
pub use validator::{ConnectivityValidator, ValidatorSettings};
