use std::env;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::ModeSet;

/// Fully-resolved configuration for one server process. Immutable for the
/// duration of an upgrade run; merging (file, then environment, then CLI
/// flags) happens once at startup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UpgradeConfig {
    pub upload_dir: String,
    pub target_dir: String,
    pub backup_dir: String,

    pub service_name: String,
    pub port: u16,
    pub max_file_size_mb: u64,

    pub enable_backup: bool,
    pub enable_service: bool,
    pub enable_cleanup: bool,
    pub cleanup_interval_hours: u64,
    pub file_max_age_hours: u64,

    pub dir_permission: String,
    pub file_permission: String,
    pub exec_permission: String,

    pub title: String,
    pub description: String,
    pub accept_types: Vec<String>,
}

impl Default for UpgradeConfig {
    fn default() -> Self {
        Self {
            upload_dir: "./uploads".to_string(),
            target_dir: "/opt/myapp".to_string(),
            backup_dir: "/opt/myapp/backup".to_string(),
            service_name: "myapp".to_string(),
            port: 8080,
            max_file_size_mb: 100,
            enable_backup: true,
            enable_service: true,
            enable_cleanup: true,
            cleanup_interval_hours: 1,
            file_max_age_hours: 24,
            dir_permission: "0755".to_string(),
            file_permission: "0644".to_string(),
            exec_permission: "0755".to_string(),
            title: "Host Program Upgrade".to_string(),
            description: "accepts .tar.gz, .zip, .gz and raw executables".to_string(),
            accept_types: vec![
                ".tar.gz".to_string(),
                ".zip".to_string(),
                ".gz".to_string(),
                "application/x-executable".to_string(),
                "application/octet-stream".to_string(),
            ],
        }
    }
}

impl UpgradeConfig {
    pub fn from_json_str(input: &str) -> Result<Self> {
        serde_json::from_str(input).context("failed to parse hoist config")
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize hoist config")
    }

    /// Load the config file, or fall back to defaults when it does not
    /// exist yet. In the fallback case a default file is written so the
    /// operator has something to edit; that write is best-effort.
    pub fn load_or_init(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            let _ = config.save(path);
            return Ok(config);
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_json_str(&raw)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let rendered = self.to_json_string()?;
        fs::write(path, rendered)
            .with_context(|| format!("failed to write config file: {}", path.display()))
    }

    /// Environment variables override file values; unparseable numeric or
    /// boolean values are ignored rather than failing startup.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("UPLOAD_DIR") {
            if !val.is_empty() {
                self.upload_dir = val;
            }
        }
        if let Ok(val) = env::var("TARGET_DIR") {
            if !val.is_empty() {
                self.target_dir = val;
            }
        }
        if let Ok(val) = env::var("BACKUP_DIR") {
            if !val.is_empty() {
                self.backup_dir = val;
            }
        }
        if let Ok(val) = env::var("SERVICE_NAME") {
            if !val.is_empty() {
                self.service_name = val;
            }
        }
        if let Ok(val) = env::var("PORT") {
            if let Ok(port) = val.parse() {
                self.port = port;
            }
        }
        if let Ok(val) = env::var("MAX_FILE_SIZE") {
            if let Ok(size) = val.parse() {
                self.max_file_size_mb = size;
            }
        }
        if let Ok(val) = env::var("ENABLE_BACKUP") {
            self.enable_backup = val == "true";
        }
        if let Ok(val) = env::var("ENABLE_SERVICE") {
            self.enable_service = val == "true";
        }
        if let Ok(val) = env::var("TITLE") {
            if !val.is_empty() {
                self.title = val;
            }
        }
    }

    pub fn mode_set(&self) -> ModeSet {
        ModeSet::from_config(self)
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }
}
