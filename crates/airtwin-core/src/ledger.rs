//! Per-scenario outcome tracking.

use std::path::Path;

use chrono::{DateTime, Utc};

use crate::ident::ScenarioIndex;
use crate::sim::RunOutcome;
use crate::Error;

/// The record of one scenario invocation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RunRecord {
    /// The scenario index.
    pub index: ScenarioIndex,
    /// How the invocation ended.
    pub outcome: RunOutcome,
    /// When the invocation was started.
    pub started_at: DateTime<Utc>,
    /// When the invocation returned.
    pub finished_at: DateTime<Utc>,
}

/// The outcome of a whole batch.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct BatchReport {
    /// The name of the simulator that ran the batch.
    pub simulator: String,
    /// One record per attempted scenario, sorted by index.
    pub records: Vec<RunRecord>,
    /// Whether the batch stopped before covering every index.
    pub interrupted: bool,
}

impl BatchReport {
    /// Summarizes the report.
    pub fn summary(&self) -> Summary {
        let succeeded = self
            .records
            .iter()
            .filter(|r| r.outcome.is_success())
            .count();
        Summary {
            attempted: self.records.len(),
            succeeded,
            failed: self.records.len() - succeeded,
            interrupted: self.interrupted,
        }
    }

    /// Iterates over the records of invocations that did not succeed.
    pub fn failures(&self) -> impl Iterator<Item = &RunRecord> {
        self.records.iter().filter(|r| !r.outcome.is_success())
    }

    /// Writes the report to `path` as pretty-printed JSON, creating parent directories.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let s = serde_json::to_string_pretty(self)?;
        std::fs::write(path, s)?;
        Ok(())
    }
}

/// Counts over a [`BatchReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Summary {
    /// Invocations attempted.
    pub attempted: usize,
    /// Invocations that exited with status 0.
    pub succeeded: usize,
    /// Invocations that did not.
    pub failed: usize,
    /// Whether the batch was cut short.
    pub interrupted: bool,
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} attempted, {} succeeded, {} failed",
            self.attempted, self.succeeded, self.failed
        )?;
        if self.interrupted {
            write!(f, " (interrupted)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(index: u32, outcome: RunOutcome) -> RunRecord {
        let now = Utc::now();
        RunRecord {
            index: ScenarioIndex::new(index),
            outcome,
            started_at: now,
            finished_at: now,
        }
    }

    fn report() -> BatchReport {
        BatchReport {
            simulator: "test".into(),
            records: vec![
                record(0, RunOutcome::Exited { code: 0 }),
                record(1, RunOutcome::Exited { code: 2 }),
                record(2, RunOutcome::Signaled),
                record(3, RunOutcome::Exited { code: 0 }),
            ],
            interrupted: false,
        }
    }

    #[test]
    fn summary_counts_outcomes() {
        let summary = report().summary();
        assert_eq!(summary.attempted, 4);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 2);
        insta::assert_snapshot!(summary.to_string(), @"4 attempted, 2 succeeded, 2 failed");
    }

    #[test]
    fn failures_lists_unsuccessful_indices() {
        let report = report();
        let failed = report.failures().map(|r| r.index.inner()).collect::<Vec<_>>();
        assert_eq!(failed, vec![1, 2]);
    }

    #[test]
    fn ledger_round_trips_through_json() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested/ledger.json");
        let report = report();
        report.write_json(&path)?;
        let read: BatchReport = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
        assert_eq!(read.records, report.records);
        assert_eq!(read.simulator, "test");
        Ok(())
    }
}
