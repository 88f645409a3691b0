use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

/// Periodic age-based sweep over the upload staging directory. Runs
/// independently of upgrade runs and never touches the target or backup
/// directories.
pub async fn run_retention_sweep(upload_dir: PathBuf, interval: Duration, max_age: Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick fires immediately; skip it so sweeps follow the
    // configured cadence.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let dir = upload_dir.clone();
        match tokio::task::spawn_blocking(move || sweep_once(&dir, max_age)).await {
            Ok(removed) => {
                info!(removed, dir = %upload_dir.display(), "retention sweep finished");
            }
            Err(err) => warn!(error = %err, "retention sweep task failed"),
        }
    }
}

/// Delete regular files under `dir` whose modification age exceeds
/// `max_age`. Unreadable entries are skipped; deletion failures are logged
/// and do not stop the sweep.
pub(crate) fn sweep_once(dir: &Path, max_age: Duration) -> usize {
    let mut removed = 0;
    sweep_dir(dir, max_age, &mut removed);
    removed
}

fn sweep_dir(dir: &Path, max_age: Duration, removed: &mut usize) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return,
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            sweep_dir(&path, max_age, removed);
            continue;
        }
        if !file_type.is_file() {
            continue;
        }

        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        let Ok(modified) = metadata.modified() else {
            continue;
        };
        let expired = modified
            .elapsed()
            .map(|age| age > max_age)
            .unwrap_or(false);
        if !expired {
            continue;
        }

        match fs::remove_file(&path) {
            Ok(()) => {
                *removed += 1;
                info!(file = %path.display(), "removed stale upload");
            }
            Err(err) => warn!(file = %path.display(), error = %err, "failed to remove stale upload"),
        }
    }
}
