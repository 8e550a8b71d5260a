//! The batch runner. This checks that the simulator exists, prepares the output directory, and
//! invokes the simulator once per scenario index.

use std::path::{Path, PathBuf};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use chrono::Utc;
use indicatif::ProgressBar;
use log::{info, warn};
use rayon::prelude::*;

use crate::config::{BatchConfig, ConfigError};
use crate::ident::ScenarioIndex;
use crate::ledger::{BatchReport, RunRecord};
use crate::sim::ScenarioSim;

/// The log target for per-scenario progress and batch completion lines. Binaries keep this
/// target at `info` regardless of the global filter.
pub const PROGRESS_TARGET: &str = "airtwin::progress";

/// Runs a [`ScenarioSim`] over every scenario in a [`BatchConfig`].
#[derive(Debug)]
pub struct BatchRunner {
    config: BatchConfig,
    progress_bar: bool,
    running: Option<Arc<AtomicBool>>,
}

impl BatchRunner {
    /// Creates a runner for `config`.
    pub fn new(config: BatchConfig) -> Self {
        Self {
            config,
            progress_bar: false,
            running: None,
        }
    }

    /// Shows a progress bar while the batch runs.
    pub fn with_progress_bar(mut self, enabled: bool) -> Self {
        self.progress_bar = enabled;
        self
    }

    /// Stops launching new invocations once `running` is cleared. Invocations already in
    /// flight are left to finish.
    pub fn with_stop_flag(mut self, running: Arc<AtomicBool>) -> Self {
        self.running = Some(running);
        self
    }

    /// The batch configuration.
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Validates the configuration, checks that the simulator binary exists and is executable,
    /// and creates the output directory.
    ///
    /// Nothing is invoked if this fails.
    pub fn prepare(&self) -> Result<(), Error> {
        self.config.validate()?;
        let binary = self.config.binary_path();
        if !binary.is_file() {
            return Err(Error::MissingBinary(binary));
        }
        if !is_executable(&binary)? {
            return Err(Error::NotExecutable(binary));
        }
        std::fs::create_dir_all(self.config.output_dir())?;
        Ok(())
    }

    /// Runs the batch.
    ///
    /// The only errors are the ones from [`BatchRunner::prepare`]. Once the first scenario has
    /// been launched, the batch runs to completion regardless of how individual invocations
    /// end; their outcomes are recorded in the returned [`BatchReport`].
    pub fn run<S: ScenarioSim>(&self, sim: &S) -> Result<BatchReport, Error> {
        self.prepare()?;
        let total = self.config.nr_scenarios();
        info!(
            "Running {total} scenarios from {} into {} with {}",
            self.config.input_dir().display(),
            self.config.output_dir().display(),
            sim.name(),
        );
        let bar = if self.progress_bar {
            ProgressBar::new(total as u64)
        } else {
            ProgressBar::hidden()
        };
        let mut report = if self.config.jobs == 1 {
            self.run_sequential(sim, &bar)
        } else {
            self.run_parallel(sim, &bar)?
        };
        bar.finish_and_clear();
        report.simulator = sim.name();
        let summary = report.summary();
        if summary.interrupted {
            warn!("Batch interrupted: {summary}");
        } else {
            info!(target: PROGRESS_TARGET, "All simulations completed: {summary}");
        }
        Ok(report)
    }

    fn run_sequential<S: ScenarioSim>(&self, sim: &S, bar: &ProgressBar) -> BatchReport {
        let mut report = BatchReport::default();
        for index in self.config.indices() {
            if !self.is_running() {
                report.interrupted = true;
                break;
            }
            report.records.push(self.run_one(sim, index));
            bar.inc(1);
        }
        report
    }

    fn run_parallel<S: ScenarioSim>(
        &self,
        sim: &S,
        bar: &ProgressBar,
    ) -> Result<BatchReport, Error> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.jobs)
            .thread_name(|i| format!("airtwin-worker-{i}"))
            .build()?;
        let indices = self.config.indices().collect::<Vec<_>>();
        let (s, r) = crossbeam_channel::unbounded();
        pool.install(|| {
            indices.into_par_iter().for_each_with(s, |s, index| {
                if !self.is_running() {
                    return;
                }
                let record = self.run_one(sim, index);
                bar.inc(1);
                s.send(record).unwrap(); // the receiver outlives every sender
            })
        });
        let mut records = r.iter().collect::<Vec<_>>();
        records.sort_by_key(|r| r.index);
        let interrupted = records.len() < self.config.nr_scenarios();
        Ok(BatchReport {
            records,
            interrupted,
            ..Default::default()
        })
    }

    fn run_one<S: ScenarioSim>(&self, sim: &S, index: ScenarioIndex) -> RunRecord {
        let position = (index.inner() - self.config.start) as usize + 1;
        info!(
            target: PROGRESS_TARGET,
            "Running scenario {index} ({position}/{})",
            self.config.nr_scenarios()
        );
        let job = self.config.job(index);
        let started_at = Utc::now();
        let outcome = sim.simulate(&job);
        let finished_at = Utc::now();
        if !outcome.is_success() {
            warn!("Scenario {index} {outcome}");
        }
        RunRecord {
            index,
            outcome,
            started_at,
            finished_at,
        }
    }

    fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .map_or(true, |r| r.load(Ordering::SeqCst))
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> std::io::Result<bool> {
    use std::os::unix::fs::PermissionsExt;

    Ok(std::fs::metadata(path)?.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(_path: &Path) -> std::io::Result<bool> {
    Ok(true)
}

/// The error type for [`BatchRunner::run`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid batch configuration.
    #[error("invalid batch configuration")]
    Config(#[from] ConfigError),

    /// The simulator binary is not where the configuration says it is.
    #[error("simulator binary not found at {}", .0.display())]
    MissingBinary(PathBuf),

    /// The simulator binary exists but nobody may execute it.
    #[error("simulator binary at {} is not executable", .0.display())]
    NotExecutable(PathBuf),

    /// Unknown configuration file type.
    #[error("unknown file type: {}", .0.display())]
    UnknownFileType(PathBuf),

    /// Error serializing/deserializing JSON.
    #[error("JSON error")]
    Json(#[from] serde_json::Error),

    /// Error deserializing Dhall.
    #[error("Dhall error")]
    Dhall(#[from] Box<serde_dhall::Error>),

    /// Error building the worker pool.
    #[error("failed to build worker pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// IO error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
