#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use airtwin_core::{BatchConfig, BatchRunner, RunOutcome, ScenarioIndex};
use airtwin_ns3::{LogMode, Ns3Binary};

/// Writes an executable stand-in for the twin. It appends its arguments to `calls.txt`, writes
/// an empty result file, and fails on scenario 0003.
fn fake_twin(dir: &Path) -> anyhow::Result<PathBuf> {
    let calls = dir.join("calls.txt");
    let script = format!(
        r#"#!/bin/sh
echo "$1 $2" >> "{}"
echo "simulating $1"
out="${{2#--output=}}"
echo '{{}}' > "$out"
case "$1" in
  *scenario_0003.json) exit 3 ;;
esac
exit 0
"#,
        calls.display()
    );
    let binary = dir.join("twin");
    std::fs::write(&binary, script)?;
    std::fs::set_permissions(&binary, std::fs::Permissions::from_mode(0o755))?;
    Ok(binary)
}

#[test]
fn ns3_batch_runs() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let binary = fake_twin(dir.path())?;
    let config = BatchConfig::builder()
        .base_dir(dir.path())
        .binary(&binary)
        .build();
    let sim = Ns3Binary::builder().binary(config.binary_path()).build();
    let report = BatchRunner::new(config.clone()).run(&sim)?;

    let calls = std::fs::read_to_string(dir.path().join("calls.txt"))?;
    let calls = calls.lines().collect::<Vec<_>>();
    assert_eq!(calls.len(), 1000);
    assert_eq!(
        calls[42],
        format!(
            "--scenario={} --output={}",
            config.input_dir().join("scenario_0042.json").display(),
            config.output_dir().join("results_0042.json").display(),
        )
    );
    assert!(calls[999].contains("scenario_0999.json"));

    assert_eq!(report.records[3].outcome, RunOutcome::Exited { code: 3 });
    assert_eq!(report.summary().failed, 1);
    assert!(config.output_dir().join("results_0999.json").is_file());
    Ok(())
}

#[test]
fn ns3_captures_logs() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let binary = fake_twin(dir.path())?;
    let config = BatchConfig::builder()
        .base_dir(dir.path())
        .binary(&binary)
        .start(5)
        .end(6)
        .build();
    let sim = Ns3Binary::builder()
        .binary(config.binary_path())
        .log_mode(LogMode::Capture)
        .build();
    let report = BatchRunner::new(config.clone()).run(&sim)?;
    assert!(report.failures().next().is_none());

    let job = config.job(ScenarioIndex::new(6));
    let log = std::fs::read_to_string(job.log_path())?;
    assert_eq!(
        log.trim(),
        format!("simulating --scenario={}", job.scenario.display())
    );
    Ok(())
}
