use std::fmt::Write as _;

/// Ordered, user-visible log of one upgrade run.
///
/// Steps are numbered in execution order, so a disabled gated step (service
/// stop/start, backup) shifts the numbering of the steps that follow.
/// Warn-only outcomes carry a `warning:` marker so the operator can see
/// where a run degraded even when the overall outcome is success.
#[derive(Debug, Default)]
pub struct RunLog {
    buf: String,
    step: u32,
}

impl RunLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Top-level line (header/footer text).
    pub fn line(&mut self, text: impl AsRef<str>) {
        self.buf.push_str(text.as_ref());
        self.buf.push('\n');
    }

    /// Open the next numbered pipeline step.
    pub fn step(&mut self, title: impl AsRef<str>) {
        self.step += 1;
        let _ = write!(self.buf, "\n{}. {}...\n", self.step, title.as_ref());
    }

    /// Indented detail line under the current step.
    pub fn detail(&mut self, text: impl AsRef<str>) {
        let _ = writeln!(self.buf, "   {}", text.as_ref());
    }

    /// Indented success line under the current step.
    pub fn ok(&mut self, text: impl AsRef<str>) {
        let _ = writeln!(self.buf, "   ✓ {}", text.as_ref());
    }

    /// Indented warn-only line under the current step.
    pub fn warn(&mut self, text: impl AsRef<str>) {
        let _ = writeln!(self.buf, "   warning: {}", text.as_ref());
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_text(self) -> String {
        self.buf
    }
}
