//! This module defines the [`BatchConfig`], which describes where scenarios live, where results
//! go, which simulator binary to run, and which scenario indices to cover.

use std::path::{Path, PathBuf};

use crate::ident::ScenarioIndex;
use crate::sim::ScenarioJob;
use crate::Error;

/// The default input directory, relative to the base directory.
pub const DEFAULT_INPUT_SUBDIR: &str = "final_scenarios_core";

/// The default output directory, relative to the base directory.
pub const DEFAULT_OUTPUT_SUBDIR: &str = "output";

/// The default location of the compiled ns-3 digital twin, relative to the base directory.
pub const DEFAULT_BINARY: &str = "ns-3-dev/build/scratch/ns3-dev-airport-twin-default";

/// The first scenario index of a full batch.
pub const DEFAULT_START: u32 = 0;

/// The last scenario index of a full batch (inclusive).
pub const DEFAULT_END: u32 = 999;

/// Batch configuration.
///
/// Relative paths are resolved against `base_dir`; absolute ones are used as-is.
#[derive(
    Debug, Clone, PartialEq, Eq, typed_builder::TypedBuilder, serde::Serialize, serde::Deserialize,
)]
#[serde(default)]
pub struct BatchConfig {
    /// The working directory everything else hangs off.
    #[builder(default = PathBuf::from("."), setter(into))]
    pub base_dir: PathBuf,
    /// The directory holding `scenario_NNNN.json` files.
    #[builder(default = PathBuf::from(DEFAULT_INPUT_SUBDIR), setter(into))]
    pub input_subdir: PathBuf,
    /// The directory receiving `results_NNNN.json` files.
    #[builder(default = PathBuf::from(DEFAULT_OUTPUT_SUBDIR), setter(into))]
    pub output_subdir: PathBuf,
    /// The simulator binary.
    #[builder(default = PathBuf::from(DEFAULT_BINARY), setter(into))]
    pub binary: PathBuf,
    /// First scenario index.
    #[builder(default = DEFAULT_START)]
    pub start: u32,
    /// Last scenario index, inclusive.
    #[builder(default = DEFAULT_END)]
    pub end: u32,
    /// Maximum number of concurrent invocations. 1 means strictly sequential.
    #[builder(default = 1)]
    pub jobs: usize,
    /// Redirect each invocation's stdout and stderr to `results_NNNN.log`.
    #[builder(default)]
    pub capture_logs: bool,
    /// Where to write the run ledger, if anywhere.
    #[builder(default, setter(strip_option, into))]
    pub ledger: Option<PathBuf>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl BatchConfig {
    /// Reads a configuration from a JSON or Dhall file. Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&contents)?,
            Some("dhall") => serde_dhall::from_str(&contents).parse().map_err(Box::new)?,
            _ => return Err(Error::UnknownFileType(path.into())),
        };
        Ok(config)
    }

    /// The resolved input directory.
    pub fn input_dir(&self) -> PathBuf {
        self.base_dir.join(&self.input_subdir)
    }

    /// The resolved output directory.
    pub fn output_dir(&self) -> PathBuf {
        self.base_dir.join(&self.output_subdir)
    }

    /// The resolved simulator binary.
    pub fn binary_path(&self) -> PathBuf {
        self.base_dir.join(&self.binary)
    }

    /// The scenario indices covered by this batch, in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = ScenarioIndex> {
        (self.start..=self.end).map(ScenarioIndex::new)
    }

    /// The number of scenarios in this batch.
    pub fn nr_scenarios(&self) -> usize {
        if self.start > self.end {
            0
        } else {
            (self.end - self.start) as usize + 1
        }
    }

    /// Builds the job for scenario `index`.
    pub fn job(&self, index: ScenarioIndex) -> ScenarioJob {
        ScenarioJob::new(index, &self.input_dir(), &self.output_dir())
    }

    /// Checks that the configuration describes a runnable batch.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start > self.end {
            return Err(ConfigError::EmptyRange {
                start: self.start,
                end: self.end,
            });
        }
        if self.jobs == 0 {
            return Err(ConfigError::ZeroJobs);
        }
        Ok(())
    }
}

/// Batch configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The index range contains nothing.
    #[error("empty scenario range: start ({start}) is greater than end ({end})")]
    EmptyRange {
        /// First index.
        start: u32,
        /// Last index.
        end: u32,
    },

    /// No workers to run scenarios on.
    #[error("the number of concurrent jobs must be at least 1")]
    ZeroJobs,
}
