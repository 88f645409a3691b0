use std::process::Command;
use std::time::Duration;

use anyhow::Result;

use crate::tools::run_named_tool;

/// Delay between a successful service start and the status health check.
/// Some services self-report slowly; the check is diagnostic, not
/// authoritative.
pub const HEALTH_CHECK_DELAY: Duration = Duration::from_secs(2);

/// Attempt to stop the managed service. One shot, no retry; the caller
/// decides that failure is warn-only (a fresh install may have no prior
/// service).
pub fn stop_service<R>(service_name: &str, run: &mut R) -> Result<()>
where
    R: FnMut(&mut Command, &str) -> Result<()>,
{
    run_named_tool(
        run,
        &mut build_service_command("stop", service_name),
        "systemctl",
        "failed to stop service",
    )
}

pub fn start_service<R>(service_name: &str, run: &mut R) -> Result<()>
where
    R: FnMut(&mut Command, &str) -> Result<()>,
{
    run_named_tool(
        run,
        &mut build_service_command("start", service_name),
        "systemctl",
        "failed to start service",
    )
}

/// Best-effort health check: query whether the service reports active.
pub fn check_service_active<R>(service_name: &str, run: &mut R) -> Result<()>
where
    R: FnMut(&mut Command, &str) -> Result<()>,
{
    run_named_tool(
        run,
        &mut build_service_command("is-active", service_name),
        "systemctl",
        "service status check failed",
    )
}

fn build_service_command(verb: &str, service_name: &str) -> Command {
    let mut command = Command::new("systemctl");
    command.arg(verb).arg(service_name);
    command
}
