//! Driver availability gate
//!
//! Determines whether the driver's capability surface is callable and, if
//! not, walks an ordered list of candidate module locations trying to
//! activate it. Activation is a process-wide, one-shot, irreversible action,
//! so the stage caches its outcome and never re-attempts it.

use crate::error::HarnessError;
use crate::reporter::Reporter;
use kvprobe_driver::{DriverError, DriverRuntime, MODULE_NAME};
use once_cell::sync::OnceCell;
use std::env;
use std::path::PathBuf;

/// Platform file name of the loadable driver module
pub fn driver_library_name() -> String {
    format!(
        "{}{}{}",
        env::consts::DLL_PREFIX,
        MODULE_NAME,
        env::consts::DLL_SUFFIX
    )
}

/// Default candidate locations, highest priority first: a modules directory
/// next to the executable, a sibling modules directory, then the build
/// output library directory.
pub fn default_candidates() -> Vec<PathBuf> {
    let lib = driver_library_name();
    let base = env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|d| d.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    vec![
        base.join("modules").join(&lib),
        base.join("..").join("modules").join(&lib),
        base.join("..").join("lib").join(&lib),
    ]
}

/// Gate stage for the rest of the pipeline
pub struct DriverAvailability<'a> {
    runtime: &'a dyn DriverRuntime,
    candidates: Vec<PathBuf>,
    outcome: OnceCell<Result<(), HarnessError>>,
}

impl<'a> DriverAvailability<'a> {
    pub fn new(runtime: &'a dyn DriverRuntime, candidates: Vec<PathBuf>) -> Self {
        Self {
            runtime,
            candidates,
            outcome: OnceCell::new(),
        }
    }

    /// Ensure the driver is callable. The first call runs the check; later
    /// calls return the cached outcome without another activation attempt.
    pub fn ensure(&self, reporter: &Reporter) -> Result<(), HarnessError> {
        if let Some(outcome) = self.outcome.get() {
            return outcome.clone();
        }
        let outcome = self.check(reporter);
        let _ = self.outcome.set(outcome.clone());
        outcome
    }

    fn check(&self, reporter: &Reporter) -> Result<(), HarnessError> {
        if self.runtime.is_active() {
            reporter.info(format!("[OK] driver module '{MODULE_NAME}' is active."));
            return Ok(());
        }

        if !self.runtime.supports_activation() {
            reporter.error(format!(
                "[FAIL] driver module '{MODULE_NAME}' is not active."
            ));
            self.report_candidates(reporter);
            reporter.error(format!(
                "Try running: kvprobe --driver-path <path-to-{}>",
                driver_library_name()
            ));
            reporter.error("[FAIL] dynamic module activation is not available in this environment.");
            return Err(HarnessError::CapabilityMissing);
        }

        for path in &self.candidates {
            if !path.is_file() {
                continue;
            }
            reporter.info(format!(
                "[INFO] driver not active. Trying to load: {}",
                path.display()
            ));
            match self.runtime.activate(path) {
                Ok(true) if self.runtime.is_active() => {
                    reporter.info(format!(
                        "[OK] activated driver module from {}.",
                        path.display()
                    ));
                    return Ok(());
                }
                Ok(_) => continue,
                Err(DriverError::ActivationUnsupported) => {
                    reporter.error(format!(
                        "Try running: kvprobe --driver-path {}",
                        path.display()
                    ));
                    reporter.error("[FAIL] dynamic module activation is not available in this environment.");
                    return Err(HarnessError::CapabilityMissing);
                }
                Err(e) => {
                    reporter.error(format!("[WARN] activation attempt failed: {e}"));
                    continue;
                }
            }
        }

        reporter.error(format!(
            "[FAIL] driver module '{MODULE_NAME}' is not active."
        ));
        self.report_candidates(reporter);
        reporter.error("Next steps:");
        reporter.error(format!(
            "  - kvprobe --driver-path <path-to-{}>",
            driver_library_name()
        ));
        reporter.error("  - Or install the driver module into the modules directory next to the kvprobe binary.");
        Err(HarnessError::DriverNotFound {
            tried: self.candidates.clone(),
        })
    }

    fn report_candidates(&self, reporter: &Reporter) {
        if self.candidates.is_empty() {
            return;
        }
        reporter.error("Tried candidate paths:");
        for path in &self.candidates {
            reporter.error(format!("  - {}", path.display()));
        }
    }
}
