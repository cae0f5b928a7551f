//! Verification summary and reporting

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Outcome of a batch verification run
///
/// Success is judged on the aggregate only: one produced file is enough for
/// the run to report success.
#[derive(Debug, Clone, Default)]
pub struct VerificationSummary {
    /// Number of input files requested
    pub requested: usize,

    /// Paths written to the output folder
    pub produced: Vec<PathBuf>,

    /// Files that could not be read, cleaned or written
    pub failed: usize,

    /// Files left alone because the output already existed
    pub skipped: usize,

    /// Duration of the run
    pub duration: Duration,
}

impl VerificationSummary {
    /// Create an empty summary for `requested` inputs
    pub fn new(requested: usize) -> Self {
        Self {
            requested,
            ..Self::default()
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// At least one file was produced
    pub fn is_successful(&self) -> bool {
        !self.produced.is_empty()
    }

    /// First produced file, if any
    pub fn first_output(&self) -> Option<&Path> {
        self.produced.first().map(PathBuf::as_path)
    }

    /// The line printed at the end of a run
    pub fn message(&self) -> String {
        if self.is_successful() {
            format!("Successfully de-identified {} files.", self.produced.len())
        } else {
            "De-identification failed.".to_string()
        }
    }

    /// Log the summary
    pub fn log_summary(&self) {
        crate::log_verify_complete!(self.requested, self.produced.len(), self.duration);

        if self.failed > 0 || self.skipped > 0 {
            tracing::warn!(
                failed = self.failed,
                skipped = self.skipped,
                "Some files were not de-identified"
            );
        }
    }
}
