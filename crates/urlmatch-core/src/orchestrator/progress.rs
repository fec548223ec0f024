//! Progress and summary types reported while a batch runs.

use crate::verdict::Verdict;

/// Sent after each task's verdict has been recorded.
#[derive(Debug, Clone)]
pub struct BatchProgress {
    pub processed: usize,
    pub total: usize,
    pub verdict: Verdict,
}

/// Totals for a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub(super) fn record(&mut self, verdict: &Verdict) {
        self.processed += 1;
        if verdict.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }
}
