use std::fmt;
use std::fs;
use std::path::Path;
use std::process::Command;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use hoist_core::UpgradeConfig;
use tracing::{info, warn};

use crate::backup::backup_target;
use crate::install::install_artifact;
use crate::permissions::apply_tree_modes;
use crate::runlog::RunLog;
use crate::service::{check_service_active, start_service, stop_service, HEALTH_CHECK_DELAY};
use crate::tools::run_command;

/// Successful run: the full step-by-step log.
#[derive(Debug)]
pub struct UpgradeReport {
    pub log: String,
}

/// Failed run: the log accumulated up to the failure point, plus the cause.
/// The caller can always render what happened before the fatal step.
#[derive(Debug)]
pub struct UpgradeFailure {
    pub log: String,
    pub error: anyhow::Error,
}

impl fmt::Display for UpgradeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#}", self.error)
    }
}

impl std::error::Error for UpgradeFailure {}

/// Run the upgrade pipeline with the real external tools and the standard
/// post-start health-check delay.
///
/// There is no rollback: a run that fails after installation (for example
/// at the permission step) leaves the new files in place. The backup
/// archive, when enabled, is kept for manual recovery.
pub fn run_upgrade(
    artifact_path: &Path,
    artifact_filename: &str,
    config: &UpgradeConfig,
) -> Result<UpgradeReport, UpgradeFailure> {
    run_upgrade_with_runner(
        artifact_path,
        artifact_filename,
        config,
        &mut run_command,
        HEALTH_CHECK_DELAY,
    )
}

/// Pipeline entry with an injected command runner, so tests substitute
/// fakes for the service-control and archive tools.
pub fn run_upgrade_with_runner<R>(
    artifact_path: &Path,
    artifact_filename: &str,
    config: &UpgradeConfig,
    run: &mut R,
    health_check_delay: Duration,
) -> Result<UpgradeReport, UpgradeFailure>
where
    R: FnMut(&mut Command, &str) -> Result<()>,
{
    let mut log = RunLog::new();
    log.line(format!("upgrade started: {artifact_filename}"));
    log.line(format!("time: {}", Local::now().format("%Y-%m-%d %H:%M:%S")));
    log.line(format!(
        "config: target={}, service={}",
        config.target_dir, config.service_name
    ));

    info!(
        artifact = artifact_filename,
        target = %config.target_dir,
        "upgrade run starting"
    );

    match drive_pipeline(
        artifact_path,
        artifact_filename,
        config,
        &mut log,
        run,
        health_check_delay,
    ) {
        Ok(()) => {
            log.line(format!(
                "\nupgrade finished: {}",
                Local::now().format("%Y-%m-%d %H:%M:%S")
            ));
            info!(artifact = artifact_filename, "upgrade run succeeded");
            Ok(UpgradeReport {
                log: log.into_text(),
            })
        }
        Err(error) => {
            warn!(artifact = artifact_filename, error = %error, "upgrade run failed");
            Err(UpgradeFailure {
                log: log.into_text(),
                error,
            })
        }
    }
}

/// The pipeline proper. Step fatality policy:
/// stop service (warn) -> ensure directories (fatal) -> backup (warn) ->
/// install (fatal) -> set modes (fatal) -> start service + health check
/// (warn). Stopping a service that was never installed legitimately fails,
/// as does backing up an empty target; those steps never abort the run.
fn drive_pipeline<R>(
    artifact_path: &Path,
    artifact_filename: &str,
    config: &UpgradeConfig,
    log: &mut RunLog,
    run: &mut R,
    health_check_delay: Duration,
) -> Result<()>
where
    R: FnMut(&mut Command, &str) -> Result<()>,
{
    let modes = config.mode_set();
    let target_dir = Path::new(&config.target_dir);
    let backup_dir = Path::new(&config.backup_dir);

    if config.enable_service {
        log.step(format!("stopping current service ({})", config.service_name));
        match stop_service(&config.service_name, run) {
            Ok(()) => log.ok("service stopped"),
            Err(err) => log.warn(format!(
                "could not stop service (it may not exist yet): {err:#}"
            )),
        }
    }

    log.step("preparing directories");
    let mut dirs = vec![target_dir];
    if config.enable_backup {
        dirs.push(backup_dir);
    }
    for dir in dirs {
        ensure_dir(dir, modes.dir)?;
        log.ok(format!(
            "directory {} ready (mode {:04o})",
            dir.display(),
            modes.dir
        ));
    }

    if config.enable_backup {
        log.step("backing up current program");
        match backup_target(target_dir, backup_dir, run) {
            Ok(backup_path) => log.ok(format!("backup saved to {}", backup_path.display())),
            Err(err) => log.warn(format!(
                "backup failed (there may be nothing to back up): {err:#}"
            )),
        }
    }

    log.step("deploying new program");
    install_artifact(target_dir, artifact_path, artifact_filename, log, run)?;

    log.step("setting program permissions");
    apply_tree_modes(target_dir, &modes, log)?;

    if config.enable_service {
        log.step(format!("starting service ({})", config.service_name));
        match start_service(&config.service_name, run) {
            Ok(()) => {
                log.ok("service started");
                thread::sleep(health_check_delay);
                match check_service_active(&config.service_name, run) {
                    Ok(()) => log.ok("service is running"),
                    Err(err) => log.warn(format!(
                        "service status check failed, verify manually: {err:#}"
                    )),
                }
            }
            Err(err) => {
                log.warn(format!("could not start service: {err:#}"));
                log.detail("start the program manually or check the service unit");
            }
        }
    }

    Ok(())
}

fn ensure_dir(dir: &Path, mode: u32) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create directory {}", dir.display()))?;
    set_dir_mode(dir, mode)
}

#[cfg(unix)]
fn set_dir_mode(dir: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(dir, fs::Permissions::from_mode(mode))
        .with_context(|| format!("failed to set mode {:04o} on {}", mode, dir.display()))
}

#[cfg(not(unix))]
fn set_dir_mode(_dir: &Path, _mode: u32) -> Result<()> {
    Ok(())
}
