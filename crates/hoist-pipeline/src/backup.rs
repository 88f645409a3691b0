use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::Result;
use chrono::Local;

use crate::tools::{build_backup_archive_command, run_named_tool};

/// Archive the current target-directory contents into the backup directory
/// before installation overwrites them.
///
/// The archive name embeds a second-resolution local timestamp; the caller
/// serializes runs, so two upgrades never race on the same name. Failure is
/// the caller's to treat as warn-only (a first-time install has nothing to
/// back up).
pub fn backup_target<R>(target_dir: &Path, backup_dir: &Path, run: &mut R) -> Result<PathBuf>
where
    R: FnMut(&mut Command, &str) -> Result<()>,
{
    let backup_path = backup_dir.join(format!(
        "backup_{}.tar.gz",
        Local::now().format("%Y%m%d_%H%M%S")
    ));
    run_named_tool(
        run,
        &mut build_backup_archive_command(&backup_path, target_dir),
        "tar",
        "failed to archive current program",
    )?;
    Ok(backup_path)
}
