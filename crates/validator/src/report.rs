//! Diagnostic collection for a single run
//!
//! Every line is stored for the outcome and emitted through tracing at the
//! same level, tagged with the run id.

use crate::outcome::{Diagnostic, FailureKind, ValidationOutcome};
use keyprobe_core::{log_at, LogLevel, RunId};

pub(crate) struct Report {
    run_id: RunId,
    diagnostics: Vec<Diagnostic>,
    remediation: Vec<String>,
}

impl Report {
    pub(crate) fn new(run_id: RunId) -> Self {
        Self {
            run_id,
            diagnostics: Vec::new(),
            remediation: Vec::new(),
        }
    }

    pub(crate) fn info(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Info, message.into());
    }

    pub(crate) fn warn(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Warn, message.into());
    }

    pub(crate) fn error(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Error, message.into());
    }

    /// Heading plus numbered hints, all at error level
    pub(crate) fn remediation(&mut self, hints: &[&str]) {
        self.error("Please check:");
        for hint in hints {
            self.error(*hint);
            self.remediation.push((*hint).to_string());
        }
    }

    pub(crate) fn finish(self, failure: Option<FailureKind>) -> ValidationOutcome {
        ValidationOutcome {
            run_id: self.run_id.to_string(),
            success: failure.is_none(),
            failure,
            diagnostics: self.diagnostics,
            remediation: self.remediation,
        }
    }

    fn push(&mut self, level: LogLevel, message: String) {
        log_at!(level, self.run_id, &message);
        self.diagnostics.push(Diagnostic::new(level, message));
    }
}
