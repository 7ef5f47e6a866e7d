//! Aggregated verdict for one smoke-test run

use std::path::PathBuf;

/// Outcome of a run: the checks never short-circuit, so every failure is
/// collected here and reported together.
#[derive(Debug, Default)]
pub struct RunReport {
    failures: Vec<String>,
    canvas: Option<(u32, u32)>,
    screenshot: Option<PathBuf>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failed check
    pub fn fail(&mut self, reason: impl Into<String>) {
        self.failures.push(reason.into());
    }

    /// Record the measured canvas dimensions
    pub fn set_canvas(&mut self, width: u32, height: u32) {
        self.canvas = Some((width, height));
    }

    /// Record where the diagnostic screenshot landed
    pub fn set_screenshot(&mut self, path: PathBuf) {
        self.screenshot = Some(path);
    }

    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    pub fn canvas(&self) -> Option<(u32, u32)> {
        self.canvas
    }

    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// 0 when every check passed, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.passed() {
            0
        } else {
            1
        }
    }

    /// Print the transcript: failures to stderr, the success summary
    /// (dimensions and screenshot path) to stdout.
    pub fn print(&self) {
        for failure in &self.failures {
            eprintln!("❌ SMOKE TEST FAILED: {}", failure);
        }
        if self.passed() {
            println!("✓ SMOKE TEST PASSED");
            if let Some((width, height)) = self.canvas {
                println!("  Canvas size: {}x{}", width, height);
            }
            if let Some(path) = &self.screenshot {
                println!("  Screenshot saved: {}", path.display());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report_passes() {
        let report = RunReport::new();
        assert!(report.passed());
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn test_any_failure_flips_exit_code() {
        let mut report = RunReport::new();
        report.set_canvas(800, 600);
        report.fail("Canvas is blank (no rendering detected)");
        assert!(!report.passed());
        assert_eq!(report.exit_code(), 1);
        assert_eq!(report.canvas(), Some((800, 600)));
    }

    #[test]
    fn test_failures_accumulate_in_order() {
        let mut report = RunReport::new();
        report.fail("Canvas element not found");
        report.fail("Canvas has zero dimensions (0x0)");
        assert_eq!(report.failures().len(), 2);
        assert!(report.failures()[0].contains("not found"));
        assert!(report.failures()[1].contains("zero dimensions"));
    }
}
