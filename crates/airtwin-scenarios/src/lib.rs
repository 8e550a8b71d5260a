//! Generates the airport surveillance scenarios fed to the digital twin.
//!
//! Each scenario is a star topology of cameras, edge servers, a core gateway, and two cloud
//! regions, with weather, operator intents, video placement, background load, and failure
//! events drawn from a seeded random stream.

#![warn(unreachable_pub, missing_debug_implementations)]

use std::fs;
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use log::info;

pub mod generator;
pub mod model;

pub use generator::ScenarioGenerator;
pub use model::Scenario;

/// Scenario `i` of a dataset is drawn with seed `BASE_SEED + i`.
pub const BASE_SEED: u64 = 42;

/// Generates scenario `index` of a dataset.
pub fn generate_scenario(index: u32) -> Scenario {
    ScenarioGenerator::new(BASE_SEED + u64::from(index)).generate(index)
}

/// The file name scenario `index` is written to.
pub fn scenario_file_name(index: u32) -> String {
    format!("scenario_{index:04}.json")
}

/// Writes `nr_scenarios` scenarios to `dir` as `scenario_NNNN.json`, creating `dir` if needed.
/// Returns the paths written, in index order.
pub fn generate_dataset(
    nr_scenarios: u32,
    dir: impl AsRef<Path>,
    bar: &ProgressBar,
) -> Result<Vec<PathBuf>, Error> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let mut paths = Vec::with_capacity(nr_scenarios as usize);
    for i in 0..nr_scenarios {
        let scenario = generate_scenario(i);
        let path = dir.join(scenario_file_name(i));
        fs::write(&path, serde_json::to_string_pretty(&scenario)?)?;
        paths.push(path);
        bar.inc(1);
    }
    info!(
        "Successfully generated {nr_scenarios} scenarios in '{}'",
        dir.display()
    );
    Ok(paths)
}

/// Error kinds for scenario generation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error serializing JSON.
    #[error("JSON error")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("IO error")]
    Io(#[from] std::io::Error),
}
