use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use hoist_core::UpgradeConfig;
use hoist_pipeline::UpgradeGate;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{cleanup, routes};

/// State shared across handlers: the resolved configuration and the gate
/// that serializes pipeline runs.
pub struct AppState {
    pub config: UpgradeConfig,
    pub gate: UpgradeGate,
}

pub async fn run(config: UpgradeConfig) -> Result<()> {
    if config.enable_cleanup {
        // A zero interval would make the ticker panic; clamp to one hour.
        let interval = Duration::from_secs(config.cleanup_interval_hours.max(1) * 3600);
        tokio::spawn(cleanup::run_retention_sweep(
            PathBuf::from(&config.upload_dir),
            interval,
            Duration::from_secs(config.file_max_age_hours * 3600),
        ));
    }

    // Headroom on top of the artifact limit for multipart framing; the
    // handler enforces the exact per-file limit.
    let body_limit = config.max_file_size_bytes() as usize + 64 * 1024;

    let addr = format!("0.0.0.0:{}", config.port);
    info!(
        %addr,
        target = %config.target_dir,
        service = %config.service_name,
        backup = config.enable_backup,
        service_management = config.enable_service,
        cleanup = config.enable_cleanup,
        "hoistd starting"
    );

    let state = Arc::new(AppState {
        config,
        gate: UpgradeGate::new(),
    });

    let app = Router::new()
        .route("/", get(routes::index))
        .route("/upload", post(routes::upload))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("server terminated")
}
