mod backup;
mod classify;
mod gate;
mod install;
mod permissions;
mod runlog;
mod service;
mod tools;
mod upgrade;

pub use backup::backup_target;
pub use classify::is_executable_artifact;
pub use gate::UpgradeGate;
pub use install::install_artifact;
pub use permissions::apply_tree_modes;
pub use runlog::RunLog;
pub use service::{check_service_active, start_service, stop_service, HEALTH_CHECK_DELAY};
pub use tools::{run_command, run_command_with_timeout, EXTERNAL_TOOL_TIMEOUT};
pub use upgrade::{run_upgrade, run_upgrade_with_runner, UpgradeFailure, UpgradeReport};
