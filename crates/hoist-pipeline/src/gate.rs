use std::sync::Mutex;

/// Serializes upgrade pipeline executions.
///
/// Concurrent runs racing on directory creation, backup naming and
/// permission-setting can corrupt the installed tree, so at most one
/// pipeline may mutate the target/backup directories at a time. One server
/// process manages one target directory, so a single process-wide gate is
/// equivalent to a per-target lock.
#[derive(Debug, Default)]
pub struct UpgradeGate {
    inner: Mutex<()>,
}

impl UpgradeGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the gate. A poisoned lock (a panicking run)
    /// does not wedge the server; the guard is recovered.
    pub fn run<F, T>(&self, f: F) -> T
    where
        F: FnOnce() -> T,
    {
        let _guard = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f()
    }
}
