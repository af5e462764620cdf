//! Driver API surface sanity check
//!
//! Confirms the driver exposes the type and constant the later stages rely
//! on, and surfaces informational data (version, module directory, active
//! module list, exported operations) with no pass/fail semantics.

use crate::error::HarnessError;
use crate::reporter::Reporter;
use kvprobe_driver::{DriverRuntime, CLIENT_TYPE, MODULE_NAME, STATUS_OK_CONSTANT};

pub fn run(runtime: &dyn DriverRuntime, reporter: &Reporter) -> Result<(), HarnessError> {
    if !runtime.type_exists(CLIENT_TYPE) {
        reporter.error(format!(
            "[FAIL] driver type '{CLIENT_TYPE}' was not found. Driver may not be initialized correctly."
        ));
        return Err(HarnessError::DriverNotInitialized(CLIENT_TYPE.to_string()));
    }
    reporter.info(format!("[OK] driver type '{CLIENT_TYPE}' exists."));

    // Older and newer driver builds rename constants while remaining
    // functional, so a missing constant is only a warning.
    if runtime.constant_defined(STATUS_OK_CONSTANT) {
        reporter.info(format!("[OK] constant '{STATUS_OK_CONSTANT}' is defined."));
    } else {
        reporter.error(format!(
            "[WARN] constant '{STATUS_OK_CONSTANT}' is not defined."
        ));
    }

    let version = runtime
        .reported_version()
        .unwrap_or_else(|| "(unknown)".to_string());
    reporter.info(format!("driver version = {version}"));

    match runtime.module_dir() {
        Some(dir) => reporter.info(format!("module dir = {}", dir.display())),
        None => reporter.info("module dir = (unset)"),
    }

    let listed = runtime
        .active_modules()
        .iter()
        .any(|name| name.eq_ignore_ascii_case(MODULE_NAME));
    reporter.info(format!(
        "'{}' in active module list = {}",
        MODULE_NAME,
        if listed { "yes" } else { "no" }
    ));

    let operations = runtime.exported_operations();
    if !operations.is_empty() {
        reporter.info(format!("exported operations: {}", operations.join(", ")));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use kvprobe_driver::{DriverClient, DriverError, HostPort};
    use std::path::{Path, PathBuf};

    struct SurfaceRuntime {
        client_type: bool,
        status_constant: bool,
        version: Option<String>,
        modules: Vec<String>,
    }

    #[async_trait]
    impl DriverRuntime for SurfaceRuntime {
        fn is_active(&self) -> bool {
            true
        }

        fn supports_activation(&self) -> bool {
            true
        }

        fn activate(&self, _path: &Path) -> Result<bool, DriverError> {
            Ok(true)
        }

        fn active_modules(&self) -> Vec<String> {
            self.modules.clone()
        }

        fn reported_version(&self) -> Option<String> {
            self.version.clone()
        }

        fn module_dir(&self) -> Option<PathBuf> {
            Some(PathBuf::from("/opt/driver/modules"))
        }

        fn type_exists(&self, name: &str) -> bool {
            self.client_type && name == CLIENT_TYPE
        }

        fn constant_defined(&self, name: &str) -> bool {
            self.status_constant && name == STATUS_OK_CONSTANT
        }

        fn exported_operations(&self) -> Vec<String> {
            vec!["put".to_string(), "get".to_string()]
        }

        async fn construct_client(
            &self,
            _hosts: &[HostPort],
            _shared: bool,
        ) -> Result<Box<dyn DriverClient>, DriverError> {
            Err(DriverError::Construction("not under test".to_string()))
        }
    }

    #[test]
    fn test_missing_client_type_is_fatal() {
        let runtime = SurfaceRuntime {
            client_type: false,
            status_constant: true,
            version: None,
            modules: Vec::new(),
        };
        let reporter = Reporter::memory();
        let err = run(&runtime, &reporter).unwrap_err();
        assert_eq!(
            err,
            HarnessError::DriverNotInitialized(CLIENT_TYPE.to_string())
        );
    }

    #[test]
    fn test_missing_constant_is_only_a_warning() {
        let runtime = SurfaceRuntime {
            client_type: true,
            status_constant: false,
            version: Some("1.2.3".to_string()),
            modules: vec![MODULE_NAME.to_string()],
        };
        let reporter = Reporter::memory();
        assert!(run(&runtime, &reporter).is_ok());
        assert!(reporter
            .error_lines()
            .iter()
            .any(|l| l.starts_with("[WARN]") && l.contains(STATUS_OK_CONSTANT)));
    }

    #[test]
    fn test_active_module_match_is_case_insensitive() {
        let runtime = SurfaceRuntime {
            client_type: true,
            status_constant: true,
            version: None,
            modules: vec!["KvDriver".to_string()],
        };
        let reporter = Reporter::memory();
        assert!(run(&runtime, &reporter).is_ok());
        assert!(reporter
            .info_lines()
            .iter()
            .any(|l| l.contains("active module list = yes")));
    }

    #[test]
    fn test_unknown_version_is_reported_as_unknown() {
        let runtime = SurfaceRuntime {
            client_type: true,
            status_constant: true,
            version: None,
            modules: Vec::new(),
        };
        let reporter = Reporter::memory();
        assert!(run(&runtime, &reporter).is_ok());
        assert!(reporter
            .info_lines()
            .iter()
            .any(|l| l.contains("driver version = (unknown)")));
    }
}
