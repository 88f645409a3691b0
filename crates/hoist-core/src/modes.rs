use crate::UpgradeConfig;

/// Mode applied when a permission specification cannot be parsed.
pub const FALLBACK_MODE: u32 = 0o755;

/// Parse a textual octal permission specification into mode bits.
///
/// Malformed input never fails the caller; it resolves to [`FALLBACK_MODE`].
pub fn parse_mode(spec: &str) -> u32 {
    match u32::from_str_radix(spec.trim(), 8) {
        Ok(mode) if mode <= 0o7777 => mode,
        _ => FALLBACK_MODE,
    }
}

/// The three per-class modes applied to an installed tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeSet {
    pub dir: u32,
    pub file: u32,
    pub exec: u32,
}

impl ModeSet {
    pub fn from_config(config: &UpgradeConfig) -> Self {
        Self {
            dir: parse_mode(&config.dir_permission),
            file: parse_mode(&config.file_permission),
            exec: parse_mode(&config.exec_permission),
        }
    }
}
