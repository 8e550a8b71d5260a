//! Runs the airport digital twin over a batch of scenarios.

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use airtwin_core::{BatchConfig, BatchReport, BatchRunner, PROGRESS_TARGET};
use airtwin_ns3::Ns3Binary;
use anyhow::Context;
use clap::Parser;
use log::info;

/// Invoke the ns-3 airport digital twin once per scenario file.
///
/// With no arguments, runs scenarios 0000-0999 from `./final_scenarios_core` into `./output`.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// JSON or Dhall file with batch settings. Flags override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base directory the other paths are relative to
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// Directory holding scenario_NNNN.json files
    #[arg(long)]
    input_subdir: Option<PathBuf>,

    /// Directory receiving results_NNNN.json files
    #[arg(long)]
    output_subdir: Option<PathBuf>,

    /// Path to the compiled simulator
    #[arg(long)]
    binary: Option<PathBuf>,

    /// First scenario index
    #[arg(long)]
    start: Option<u32>,

    /// Last scenario index (inclusive)
    #[arg(long)]
    end: Option<u32>,

    /// Number of scenarios to simulate concurrently
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Write each simulation's console output to results_NNNN.log
    #[arg(long)]
    capture_logs: bool,

    /// Write a JSON ledger of per-scenario outcomes to this file
    #[arg(long)]
    ledger: Option<PathBuf>,

    /// Show a progress bar
    #[arg(long)]
    progress: bool,
}

impl Args {
    fn into_config(self) -> anyhow::Result<BatchConfig> {
        let mut config = match &self.config {
            Some(path) => BatchConfig::from_file(path)
                .with_context(|| format!("failed to read config {}", path.display()))?,
            None => BatchConfig::default(),
        };
        if let Some(base_dir) = self.base_dir {
            config.base_dir = base_dir;
        }
        if let Some(input_subdir) = self.input_subdir {
            config.input_subdir = input_subdir;
        }
        if let Some(output_subdir) = self.output_subdir {
            config.output_subdir = output_subdir;
        }
        if let Some(binary) = self.binary {
            config.binary = binary;
        }
        if let Some(start) = self.start {
            config.start = start;
        }
        if let Some(end) = self.end {
            config.end = end;
        }
        if let Some(jobs) = self.jobs {
            config.jobs = jobs;
        }
        if let Some(ledger) = self.ledger {
            config.ledger = Some(ledger);
        }
        config.capture_logs |= self.capture_logs;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    // Progress lines stay visible under any RUST_LOG filter.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .filter(Some(PROGRESS_TARGET), log::LevelFilter::Info)
        .init();
    let args = Args::parse();
    let progress = args.progress;
    let config = args.into_config()?;

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .with_context(|| "failed to set interrupt handler")?;

    let sim = Ns3Binary::builder()
        .binary(config.binary_path())
        .log_mode(config.capture_logs.into())
        .build();
    let ledger = config.ledger.as_ref().map(|p| config.base_dir.join(p));
    let runner = BatchRunner::new(config)
        .with_progress_bar(progress)
        .with_stop_flag(running);
    let report = runner.run(&sim).with_context(|| "failed to start batch")?;

    if let Some(path) = ledger {
        report
            .write_json(&path)
            .with_context(|| format!("failed to write ledger {}", path.display()))?;
        info!("Ledger written to {}", path.display());
    }
    ensure_complete(&report)
}

/// Fails if the batch was cut short, so a partial run never exits like a finished one.
fn ensure_complete(report: &BatchReport) -> anyhow::Result<()> {
    let summary = report.summary();
    anyhow::ensure!(
        !summary.interrupted,
        "batch interrupted after {} scenarios",
        summary.attempted
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_means_the_default_batch() -> anyhow::Result<()> {
        let args = Args::try_parse_from(["airtwin-batch"])?;
        assert_eq!(args.into_config()?, BatchConfig::default());
        Ok(())
    }

    #[test]
    fn flags_override_defaults() -> anyhow::Result<()> {
        let args = Args::try_parse_from([
            "airtwin-batch",
            "--base-dir",
            "/data",
            "--end",
            "9",
            "--jobs",
            "4",
            "--capture-logs",
        ])?;
        let config = args.into_config()?;
        assert_eq!(config.base_dir, PathBuf::from("/data"));
        assert_eq!(config.start, 0);
        assert_eq!(config.end, 9);
        assert_eq!(config.jobs, 4);
        assert!(config.capture_logs);
        Ok(())
    }

    #[test]
    fn interrupted_batch_is_an_error() {
        let complete = BatchReport::default();
        assert!(ensure_complete(&complete).is_ok());
        let partial = BatchReport {
            interrupted: true,
            ..Default::default()
        };
        let err = ensure_complete(&partial).unwrap_err();
        assert_eq!(err.to_string(), "batch interrupted after 0 scenarios");
    }

    #[test]
    fn flags_override_config_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("batch.json");
        std::fs::write(&path, r#"{ "start": 100, "end": 199, "jobs": 8 }"#)?;
        let path = path.to_string_lossy();
        let args =
            Args::try_parse_from(["airtwin-batch", "--config", &*path, "--jobs", "2"])?;
        let config = args.into_config()?;
        assert_eq!(config.start, 100);
        assert_eq!(config.end, 199);
        assert_eq!(config.jobs, 2);
        Ok(())
    }
}
