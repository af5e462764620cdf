//! Verdict aggregation
//!
//! Maps each terminal condition to one process exit code and the final
//! summary line. A legitimately skipped live test shares the success exit
//! code so pipelines do not mistake "no cluster configured" for "driver
//! broken".

use crate::error::HarnessError;
use crate::reporter::Reporter;

/// Terminal outcome of a run
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// All stages passed, including the live round trip
    Passed,
    /// Driver checks passed; no target cluster was configured
    SkippedLiveTest,
    /// A stage failed fatally
    Failed(HarnessError),
}

impl Verdict {
    /// Process exit code for this outcome
    pub fn exit_code(&self) -> i32 {
        match self {
            Verdict::Passed | Verdict::SkippedLiveTest => 0,
            Verdict::Failed(error) => error.exit_code(),
        }
    }

    /// Emit the final summary line
    pub fn summarize(&self, reporter: &Reporter) {
        match self {
            Verdict::Passed => {
                reporter.info("[PASS] driver smoke test completed successfully.");
            }
            Verdict::SkippedLiveTest => {
                reporter.info("[PASS] driver checks passed; live cluster test skipped.");
            }
            Verdict::Failed(error) => {
                reporter.error(format!("[FAIL] {error}"));
            }
        }
    }
}
