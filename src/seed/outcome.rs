//! Per-table seeding outcomes

use serde::Serialize;

/// Three-way result of seeding one table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SeedOutcome {
    AllSucceeded { count: usize },
    NoneSucceeded { total: usize },
    Partial { succeeded: usize, total: usize },
}

impl SeedOutcome {
    /// Classifies a table's counters.
    ///
    /// `total` counts every row of every source that loaded. Any skipped
    /// source or failed batch rules out `AllSucceeded`.
    pub fn classify(total: usize, inserted: usize, skipped_sources: usize, failed_batches: usize) -> Self {
        let clean = skipped_sources == 0 && failed_batches == 0;
        if clean && inserted == total {
            SeedOutcome::AllSucceeded { count: inserted }
        } else if inserted == 0 {
            SeedOutcome::NoneSucceeded { total }
        } else {
            SeedOutcome::Partial {
                succeeded: inserted,
                total,
            }
        }
    }

    pub fn inserted(&self) -> usize {
        match self {
            SeedOutcome::AllSucceeded { count } => *count,
            SeedOutcome::NoneSucceeded { .. } => 0,
            SeedOutcome::Partial { succeeded, .. } => *succeeded,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SeedOutcome::AllSucceeded { .. })
    }
}

/// Outcome of one table plus the counters it was derived from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedReport {
    pub table: String,
    pub outcome: SeedOutcome,
    pub sources: usize,
    pub skipped_sources: usize,
    pub batches: usize,
    pub failed_batches: usize,
}
