//! An interface to the compiled ns-3 airport digital twin.
//!
//! This crate is tightly coupled to the command-line interface of the twin binary:
//! `<binary> --scenario=<path> --output=<path>`.

#![warn(unreachable_pub, missing_debug_implementations, missing_docs)]

use std::ffi::OsString;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

use airtwin_core::{RunOutcome, ScenarioJob, ScenarioSim};
use derivative::Derivative;
use log::debug;

/// The ns-3 digital twin binary.
#[derive(Debug, Clone, typed_builder::TypedBuilder, serde::Serialize, serde::Deserialize)]
pub struct Ns3Binary {
    /// The path to the compiled simulator.
    #[builder(setter(into))]
    pub binary: PathBuf,
    /// What to do with the simulator's stdout and stderr.
    #[builder(default)]
    #[serde(default)]
    pub log_mode: LogMode,
}

impl Ns3Binary {
    /// The arguments passed to the binary for `job`.
    pub fn args_for(&self, job: &ScenarioJob) -> Vec<OsString> {
        let mut scenario = OsString::from("--scenario=");
        scenario.push(&job.scenario);
        let mut output = OsString::from("--output=");
        output.push(&job.output);
        vec![scenario, output]
    }

    fn invoke(&self, job: &ScenarioJob) -> io::Result<ExitStatus> {
        let mut cmd = Command::new(&self.binary);
        cmd.args(self.args_for(job));
        if let LogMode::Capture = self.log_mode {
            let log = File::create(job.log_path())?;
            cmd.stdout(log.try_clone()?).stderr(log);
        }
        cmd.stdin(Stdio::null());
        debug!("{cmd:?}");
        cmd.status()
    }
}

impl ScenarioSim for Ns3Binary {
    fn name(&self) -> String {
        "ns3".into()
    }

    fn simulate(&self, job: &ScenarioJob) -> RunOutcome {
        match self.invoke(job) {
            Ok(status) => match status.code() {
                Some(code) => RunOutcome::Exited { code },
                None => RunOutcome::Signaled,
            },
            Err(e) => RunOutcome::SpawnFailed {
                reason: e.to_string(),
            },
        }
    }
}

/// Where the simulator's console output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Derivative, serde::Serialize, serde::Deserialize)]
#[derivative(Default)]
#[serde(rename_all = "lowercase")]
pub enum LogMode {
    /// Share the orchestrator's stdout and stderr.
    #[derivative(Default)]
    Inherit,
    /// Write both streams to `results_NNNN.log` beside the result file.
    Capture,
}

impl From<bool> for LogMode {
    fn from(capture: bool) -> Self {
        if capture {
            LogMode::Capture
        } else {
            LogMode::Inherit
        }
    }
}
