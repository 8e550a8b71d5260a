#![warn(unreachable_pub, missing_debug_implementations, missing_docs)]

//! The core batch-orchestration library for the airport digital twin. This crate defines [the
//! runner](run::BatchRunner) that invokes a [scenario simulator](sim::ScenarioSim) once per
//! scenario index and records how each invocation ended.

pub mod config;
pub mod ident;
pub mod ledger;
pub mod run;
pub mod sim;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{BatchConfig, ConfigError};
pub use ident::ScenarioIndex;
pub use ledger::{BatchReport, RunRecord, Summary};
pub use run::{BatchRunner, Error, PROGRESS_TARGET};
pub use sim::{RunOutcome, ScenarioJob, ScenarioSim};
