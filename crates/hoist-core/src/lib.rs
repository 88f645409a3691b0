mod artifact;
mod config;
mod modes;

pub use artifact::{gzip_output_name, ArtifactKind};
pub use config::UpgradeConfig;
pub use modes::{parse_mode, ModeSet, FALLBACK_MODE};

#[cfg(test)]
mod tests;
