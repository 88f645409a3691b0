use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::response::Html;
use tracing::{info, warn};

use crate::render::{self, MessageKind};
use crate::server::AppState;

pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render::page(&state.config, None, ""))
}

/// Accept one uploaded artifact, stage it under the upload directory and
/// run the upgrade pipeline. Input errors (missing field, bad filename,
/// oversized payload) are rejected here, before the pipeline starts.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Html<String> {
    let config = state.config.clone();

    let mut staged: Option<(PathBuf, String)> = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => return failure_page(&config, format!("upload failed: {err}")),
        };
        if field.name() != Some("file") {
            continue;
        }

        let Some(filename) = field.file_name().and_then(sanitize_filename) else {
            return failure_page(&config, "upload failed: missing or invalid filename".into());
        };
        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(err) => return failure_page(&config, format!("upload failed: {err}")),
        };
        if bytes.len() as u64 > config.max_file_size_bytes() {
            return failure_page(
                &config,
                format!(
                    "upload failed: file exceeds the {} MB limit",
                    config.max_file_size_mb
                ),
            );
        }

        let upload_dir = PathBuf::from(&config.upload_dir);
        if let Err(err) = tokio::fs::create_dir_all(&upload_dir).await {
            return failure_page(&config, format!("failed to create upload directory: {err}"));
        }
        let staged_path = upload_dir.join(&filename);
        if let Err(err) = tokio::fs::write(&staged_path, &bytes).await {
            return failure_page(&config, format!("failed to save uploaded file: {err}"));
        }

        info!(file = %filename, bytes = bytes.len(), "upload staged");
        staged = Some((staged_path, filename));
        break;
    }

    let Some((staged_path, filename)) = staged else {
        return failure_page(&config, "upload failed: no file field in form".into());
    };

    let worker_state = Arc::clone(&state);
    let outcome = tokio::task::spawn_blocking(move || {
        worker_state.gate.run(|| {
            hoist_pipeline::run_upgrade(&staged_path, &filename, &worker_state.config)
        })
    })
    .await;

    match outcome {
        Ok(Ok(report)) => Html(render::page(
            &config,
            Some(("program upgraded successfully", MessageKind::Success)),
            &report.log,
        )),
        Ok(Err(failure)) => {
            warn!(error = %failure, "upgrade failed");
            Html(render::page(
                &config,
                Some((&format!("upgrade failed: {failure}"), MessageKind::Error)),
                &failure.log,
            ))
        }
        Err(err) => failure_page(&config, format!("upgrade task failed: {err}")),
    }
}

fn failure_page(config: &hoist_core::UpgradeConfig, message: String) -> Html<String> {
    warn!("{message}");
    Html(render::page(
        config,
        Some((&message, MessageKind::Error)),
        "",
    ))
}

/// Reduce a client-supplied filename to its final path component; anything
/// that does not yield a plain name is rejected.
pub(crate) fn sanitize_filename(raw: &str) -> Option<String> {
    let name = Path::new(raw).file_name()?.to_str()?;
    if name.is_empty() || name == "." || name == ".." {
        return None;
    }
    Some(name.to_string())
}
