mod cleanup;
mod render;
mod routes;
mod server;

#[cfg(test)]
mod tests;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use hoist_core::UpgradeConfig;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hoistd")]
#[command(about = "HTTP upgrade service for a managed host program", long_about = None)]
struct Cli {
    /// Path to the JSON config file.
    #[arg(long, default_value = "./config.json")]
    config: PathBuf,
    /// Listen port (overrides the config file).
    #[arg(long)]
    port: Option<u16>,
    /// Target installation directory (overrides the config file).
    #[arg(long)]
    target: Option<String>,
    /// Managed service name (overrides the config file).
    #[arg(long)]
    service: Option<String>,
    /// Write the default config file and exit.
    #[arg(long)]
    gen_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if cli.gen_config {
        UpgradeConfig::default().save(&cli.config)?;
        info!(path = %cli.config.display(), "default config written");
        return Ok(());
    }

    let mut config = UpgradeConfig::load_or_init(&cli.config)?;
    config.apply_env_overrides();
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(target) = cli.target {
        config.target_dir = target;
    }
    if let Some(service) = cli.service {
        config.service_name = service;
    }

    if config.enable_service && !running_as_root() {
        warn!("not running as root; stopping and starting the managed service will likely fail");
    }

    server::run(config).await
}

#[cfg(unix)]
fn running_as_root() -> bool {
    // SAFETY: geteuid has no failure modes and touches no memory.
    unsafe { libc::geteuid() == 0 }
}

#[cfg(not(unix))]
fn running_as_root() -> bool {
    true
}
