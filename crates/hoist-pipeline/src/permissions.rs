use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use hoist_core::ModeSet;

use crate::classify::is_executable_artifact;
use crate::runlog::RunLog;

/// Walk the installed tree and set the configured mode on every entry:
/// directory mode for directories, executable mode for files the classifier
/// marks executable, plain file mode otherwise.
///
/// Executable-mode assignments are logged for audit; plain-file assignments
/// are kept out of the log to keep it terse. Symlinks are left untouched.
/// Any failure is fatal and aborts the run.
pub fn apply_tree_modes(target_dir: &Path, modes: &ModeSet, log: &mut RunLog) -> Result<()> {
    set_mode(target_dir, modes.dir)?;
    apply_tree_modes_recursive(target_dir, modes, log)
}

fn apply_tree_modes_recursive(dir: &Path, modes: &ModeSet, log: &mut RunLog) -> Result<()> {
    for entry in
        fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?
    {
        let entry = entry.with_context(|| format!("failed reading entry in {}", dir.display()))?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .with_context(|| format!("failed to stat {}", path.display()))?;

        if file_type.is_symlink() {
            continue;
        }
        if file_type.is_dir() {
            set_mode(&path, modes.dir)?;
            apply_tree_modes_recursive(&path, modes, log)?;
            continue;
        }

        if is_executable_artifact(&path) {
            set_mode(&path, modes.exec)?;
            log.ok(format!(
                "executable mode {:04o} set: {}",
                modes.exec,
                path.display()
            ));
        } else {
            set_mode(&path, modes.file)?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(mode))
        .with_context(|| format!("failed to set mode {:04o} on {}", mode, path.display()))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}
