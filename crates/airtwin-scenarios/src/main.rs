use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use indicatif::ProgressBar;

/// Generate airport surveillance scenarios for the digital twin.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Number of scenarios
    #[arg(short, long, default_value_t = 1000)]
    nr_scenarios: u32,

    /// Output directory
    #[arg(short, long, default_value = "final_scenarios_core")]
    output_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let bar = ProgressBar::new(u64::from(args.nr_scenarios));
    airtwin_scenarios::generate_dataset(args.nr_scenarios, &args.output_dir, &bar)
        .with_context(|| format!("failed to write scenarios to {}", args.output_dir.display()))?;
    bar.finish_and_clear();
    Ok(())
}
