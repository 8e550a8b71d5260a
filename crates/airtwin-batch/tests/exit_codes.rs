use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

const BIN: &str = env!("CARGO_BIN_EXE_airtwin-batch");

#[test]
fn missing_binary_exits_with_one() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let output = Command::new(BIN)
        .arg("--base-dir")
        .arg(dir.path())
        .output()?;
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("simulator binary not found"));
    assert!(stderr.contains("ns3-dev-airport-twin-default"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn failing_simulations_still_exit_with_zero() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    write_twin(dir.path(), "exit 7", 0o755)?;
    let output = Command::new(BIN)
        .arg("--base-dir")
        .arg(dir.path())
        .args(["--binary", "twin", "--end", "4", "--ledger", "ledger.json"])
        .output()?;
    assert_eq!(output.status.code(), Some(0));
    assert!(dir.path().join("output").is_dir());

    let ledger = read_json(&dir.path().join("ledger.json"))?;
    let records = ledger["records"].as_array().cloned().unwrap_or_default();
    assert_eq!(records.len(), 5);
    assert!(records
        .iter()
        .all(|r| r["outcome"]["kind"] == "exited" && r["outcome"]["code"] == 7));
    assert_eq!(records[4]["index"], 4);
    Ok(())
}

fn read_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?)
}

#[cfg(unix)]
#[test]
fn non_executable_binary_exits_with_one() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    write_twin(dir.path(), "exit 0", 0o644)?;
    let output = Command::new(BIN)
        .arg("--base-dir")
        .arg(dir.path())
        .args(["--binary", "twin", "--end", "4", "--ledger", "ledger.json"])
        .output()?;
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("is not executable"));
    assert!(!dir.path().join("output").exists());
    assert!(!dir.path().join("ledger.json").exists());
    Ok(())
}

#[cfg(unix)]
#[test]
fn progress_lines_ignore_the_log_filter() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    write_twin(dir.path(), "exit 0", 0o755)?;
    let output = Command::new(BIN)
        .env("RUST_LOG", "warn")
        .arg("--base-dir")
        .arg(dir.path())
        .args(["--binary", "twin", "--end", "2"])
        .output()?;
    assert_eq!(output.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Running scenario 0000 (1/3)"), "{stderr}");
    assert!(stderr.contains("Running scenario 0002 (3/3)"), "{stderr}");
    assert!(stderr.contains("All simulations completed"), "{stderr}");
    Ok(())
}

#[cfg(unix)]
#[test]
fn interrupted_batch_exits_with_one() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    write_twin(dir.path(), "sleep 0.2", 0o755)?;
    let mut child = Command::new(BIN)
        .arg("--base-dir")
        .arg(dir.path())
        .args(["--binary", "twin", "--ledger", "ledger.json"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    std::thread::sleep(std::time::Duration::from_secs(1));
    let killed = Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()?;
    assert!(killed.success());
    let status = child.wait()?;
    assert_eq!(status.code(), Some(1));

    let ledger = read_json(&dir.path().join("ledger.json"))?;
    assert_eq!(ledger["interrupted"], true);
    let attempted = ledger["records"].as_array().map_or(0, |r| r.len());
    assert!(attempted > 0 && attempted < 1000, "attempted {attempted}");
    Ok(())
}

/// Writes a shell-script stand-in for the simulator at `<dir>/twin`.
#[cfg(unix)]
fn write_twin(dir: &Path, body: &str, mode: u32) -> anyhow::Result<PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    let binary = dir.join("twin");
    std::fs::write(&binary, format!("#!/bin/sh\n{body}\n"))?;
    std::fs::set_permissions(&binary, std::fs::Permissions::from_mode(mode))?;
    Ok(binary)
}
