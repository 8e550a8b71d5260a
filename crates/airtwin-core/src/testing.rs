use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use tempfile::TempDir;

use crate::config::BatchConfig;
use crate::ident::ScenarioIndex;
use crate::sim::{RunOutcome, ScenarioJob, ScenarioSim};

/// A simulator that remembers which scenarios it was asked to run and fails on demand.
#[derive(Debug, Default)]
pub(crate) struct RecordingSim {
    invocations: Mutex<Vec<ScenarioIndex>>,
    failing: HashSet<ScenarioIndex>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl RecordingSim {
    pub(crate) fn failing_at(indices: impl IntoIterator<Item = ScenarioIndex>) -> Self {
        Self {
            failing: indices.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Every simulation takes at least `delay`.
    pub(crate) fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Default::default()
        }
    }

    pub(crate) fn invocations(&self) -> Vec<ScenarioIndex> {
        self.invocations.lock().unwrap().clone()
    }

    /// The most simulations ever running at once.
    pub(crate) fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

impl ScenarioSim for RecordingSim {
    fn name(&self) -> String {
        "recording".into()
    }

    fn simulate(&self, job: &ScenarioJob) -> RunOutcome {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        self.invocations.lock().unwrap().push(job.index);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if self.failing.contains(&job.index) {
            RunOutcome::Exited { code: 1 }
        } else {
            RunOutcome::Exited { code: 0 }
        }
    }
}

/// A default batch rooted in a fresh temporary directory, with an executable file where the
/// binary should be.
pub(crate) fn batch_with_binary() -> std::io::Result<(TempDir, BatchConfig)> {
    let dir = tempfile::tempdir()?;
    let config = BatchConfig::builder().base_dir(dir.path()).build();
    let binary = config.binary_path();
    if let Some(parent) = binary.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&binary, "")?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&binary, std::fs::Permissions::from_mode(0o755))?;
    }
    Ok((dir, config))
}
