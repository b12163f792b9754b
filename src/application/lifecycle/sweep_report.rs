//! Aggregate result of one sweep run.

use serde::Serialize;

/// Collect-and-continue result of a sweep.
///
/// A sweep never aborts on a single membership's failure; it finishes the
/// batch and reports the tally. `errors` carries one message per failed
/// item for the operator log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Items intentionally not acted on (already handled, recently
    /// reminded, or the sweep was stopped before reaching them).
    pub skipped: usize,
    pub errors: Vec<String>,
}

impl SweepReport {
    pub fn record_success(&mut self) {
        self.processed += 1;
        self.succeeded += 1;
    }

    pub fn record_skip(&mut self) {
        self.processed += 1;
        self.skipped += 1;
    }

    pub fn record_failure(&mut self, error: impl Into<String>) {
        self.processed += 1;
        self.failed += 1;
        self.errors.push(error.into());
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tallies_add_up() {
        let mut report = SweepReport::default();
        report.record_success();
        report.record_success();
        report.record_skip();
        report.record_failure("store write failed");

        assert_eq!(report.processed, 4);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.errors.len(), 1);
        assert!(!report.is_clean());
    }
}
