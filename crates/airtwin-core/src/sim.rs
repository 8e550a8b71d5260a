//! This module defines the [`ScenarioSim`] trait, the interface between the batch runner and
//! whatever actually simulates a scenario.

use std::path::{Path, PathBuf};

use crate::ident::ScenarioIndex;

/// A scenario simulator.
///
/// Implementations must not panic or fail on a bad scenario: every way an invocation can go
/// wrong is reported as a [`RunOutcome`] so that the batch keeps going.
pub trait ScenarioSim: Sync {
    /// Get the simulator's name.
    fn name(&self) -> String;

    /// Simulate one scenario, blocking until the simulation is done.
    fn simulate(&self, job: &ScenarioJob) -> RunOutcome;
}

impl<T: ScenarioSim + ?Sized> ScenarioSim for &T {
    fn name(&self) -> String {
        (**self).name()
    }

    fn simulate(&self, job: &ScenarioJob) -> RunOutcome {
        (**self).simulate(job)
    }
}

/// A single unit of work: simulate one scenario file into one result file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioJob {
    /// The scenario index.
    pub index: ScenarioIndex,
    /// The scenario definition to read.
    pub scenario: PathBuf,
    /// Where results should be written.
    pub output: PathBuf,
}

impl ScenarioJob {
    /// Creates the job for `index` reading from `input_dir` and writing to `output_dir`.
    pub fn new(index: ScenarioIndex, input_dir: &Path, output_dir: &Path) -> Self {
        Self {
            index,
            scenario: input_dir.join(format!("scenario_{index}.json")),
            output: output_dir.join(format!("results_{index}.json")),
        }
    }

    /// The path next to the result file where the simulator's console output can be kept.
    pub fn log_path(&self) -> PathBuf {
        self.output.with_extension("log")
    }
}

/// How a single invocation ended.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunOutcome {
    /// The process exited with a status code.
    Exited {
        /// The exit code.
        code: i32,
    },
    /// The process was terminated without an exit code (e.g. by a signal).
    Signaled,
    /// The process could not be started at all.
    SpawnFailed {
        /// Why the spawn failed.
        reason: String,
    },
}

impl RunOutcome {
    /// Returns `true` if the process exited with status 0.
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Exited { code: 0 })
    }
}

impl std::fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunOutcome::Exited { code } => write!(f, "exited with code {code}"),
            RunOutcome::Signaled => write!(f, "terminated by signal"),
            RunOutcome::SpawnFailed { reason } => write!(f, "failed to start: {reason}"),
        }
    }
}
