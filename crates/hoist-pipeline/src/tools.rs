use std::ffi::OsString;
use std::io::{self, Read};
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};

/// Upper bound on any single external tool invocation. A hung `systemctl`
/// or `tar` must not block the pipeline forever; the child is killed once
/// the deadline passes.
pub const EXTERNAL_TOOL_TIMEOUT: Duration = Duration::from_secs(300);

const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run an external tool to completion, capturing stdout/stderr for the
/// error message on nonzero exit.
pub fn run_command(command: &mut Command, context_message: &str) -> Result<()> {
    run_command_with_timeout(command, EXTERNAL_TOOL_TIMEOUT, context_message)
}

pub fn run_command_with_timeout(
    command: &mut Command,
    timeout: Duration,
    context_message: &str,
) -> Result<()> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    let mut child = command
        .spawn()
        .with_context(|| format!("{context_message}: command failed to start"))?;

    let stdout_handle = child.stdout.take().map(drain_pipe);
    let stderr_handle = child.stderr.take().map(drain_pipe);

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {}
            Err(err) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(err)
                    .with_context(|| format!("{context_message}: failed to wait for command"));
            }
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Err(anyhow!(
                "{context_message}: command did not finish within {}s and was killed",
                timeout.as_secs()
            ));
        }
        thread::sleep(WAIT_POLL_INTERVAL);
    };

    if status.success() {
        return Ok(());
    }

    let stdout = collect_pipe(stdout_handle);
    let stderr = collect_pipe(stderr_handle);
    Err(anyhow!(
        "{context_message}: status={} stdout='{}' stderr='{}'",
        status,
        stdout.trim(),
        stderr.trim()
    ))
}

fn drain_pipe(mut reader: impl Read + Send + 'static) -> thread::JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = reader.read_to_end(&mut buf);
        buf
    })
}

fn collect_pipe(handle: Option<thread::JoinHandle<Vec<u8>>>) -> String {
    let bytes = handle
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Failures to even start a tool surface as `io::ErrorKind::NotFound`
/// somewhere in the chain; callers rewrite those into "install tool X"
/// guidance instead of a bare exec error.
pub(crate) fn error_chain_has_not_found(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<io::Error>()
            .is_some_and(|io_err| io_err.kind() == io::ErrorKind::NotFound)
    })
}

/// Run a named tool, distinguishing "tool reported an error" from "tool is
/// not installed" in the resulting message.
pub(crate) fn run_named_tool<R>(
    run: &mut R,
    command: &mut Command,
    tool: &str,
    context_message: &str,
) -> Result<()>
where
    R: FnMut(&mut Command, &str) -> Result<()>,
{
    run(command, context_message).map_err(|err| {
        if error_chain_has_not_found(&err) {
            return anyhow!(
                "{context_message}: required tool '{tool}' was not found on PATH; install it and retry"
            );
        }
        err
    })
}

pub(crate) fn build_tar_extract_command(archive_path: &Path, target_dir: &Path) -> Command {
    let mut command = Command::new("tar");
    command
        .arg("-xzf")
        .arg(archive_path)
        .arg("-C")
        .arg(target_dir);
    command
}

pub(crate) fn build_zip_extract_command(archive_path: &Path, target_dir: &Path) -> Command {
    let mut command = Command::new("unzip");
    command
        .arg("-o")
        .arg(archive_path)
        .arg("-d")
        .arg(target_dir);
    command
}

pub(crate) fn build_gzip_decompress_command(artifact_path: &Path, output_path: &Path) -> Command {
    let mut command = Command::new("sh");
    command.arg("-c").arg(format!(
        "gunzip -c {} > {}",
        shell_quote(artifact_path),
        shell_quote(output_path)
    ));
    command
}

pub(crate) fn build_backup_archive_command(backup_path: &Path, target_dir: &Path) -> Command {
    let mut command = Command::new("tar");
    command
        .arg("-czf")
        .arg(backup_path)
        .arg("-C")
        .arg(target_dir)
        .arg(".");
    command
}

fn shell_quote(path: &Path) -> String {
    let mut os = OsString::new();
    os.push(path.as_os_str());
    format!("'{}'", os.to_string_lossy().replace('\'', r"'\''"))
}
