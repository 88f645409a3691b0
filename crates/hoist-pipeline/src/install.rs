use std::fs;
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};
use hoist_core::{gzip_output_name, ArtifactKind};

use crate::runlog::RunLog;
use crate::tools::{
    build_gzip_decompress_command, build_tar_extract_command, build_zip_extract_command,
    run_named_tool,
};

/// Materialize the artifact's contents under the target directory.
///
/// Dispatch is purely on the artifact filename's suffix. Every branch logs
/// its step description before running, so a failed extraction still shows
/// what was attempted. All failures here are fatal: a broken install must
/// never be reported as success.
pub fn install_artifact<R>(
    target_dir: &Path,
    artifact_path: &Path,
    artifact_filename: &str,
    log: &mut RunLog,
    run: &mut R,
) -> Result<()>
where
    R: FnMut(&mut Command, &str) -> Result<()>,
{
    match ArtifactKind::infer_from_filename(artifact_filename) {
        ArtifactKind::TarGz => {
            log.detail("extracting tar.gz archive");
            run_named_tool(
                run,
                &mut build_tar_extract_command(artifact_path, target_dir),
                "tar",
                "failed to extract tar.gz archive",
            )?;
        }
        ArtifactKind::Gzip => {
            log.detail("decompressing gz file");
            let output_path = target_dir.join(gzip_output_name(artifact_filename));
            run_named_tool(
                run,
                &mut build_gzip_decompress_command(artifact_path, &output_path),
                "gunzip",
                "failed to decompress gz file",
            )?;
        }
        ArtifactKind::Zip => {
            log.detail("extracting zip archive");
            run_named_tool(
                run,
                &mut build_zip_extract_command(artifact_path, target_dir),
                "unzip",
                "failed to extract zip archive",
            )?;
        }
        ArtifactKind::Raw => {
            log.detail("copying file verbatim");
            let target_path = target_dir.join(artifact_filename);
            fs::copy(artifact_path, &target_path).with_context(|| {
                format!(
                    "failed to copy {} to {}",
                    artifact_path.display(),
                    target_path.display()
                )
            })?;
        }
    }

    log.ok("program deployed");
    Ok(())
}
