//! Live-cluster connectivity probe
//!
//! Construction failure and a constructed client that reports itself not
//! connected are distinct fatal conditions with distinct exit codes.

use crate::error::HarnessError;
use crate::reporter::Reporter;
use kvprobe_driver::{DriverClient, DriverRuntime, HostPort};

/// Construct a client bound to a single seed address with non-shared
/// instance semantics
pub async fn connect_client(
    runtime: &dyn DriverRuntime,
    host: &str,
    port: u16,
    reporter: &Reporter,
) -> Result<Box<dyn DriverClient>, HarnessError> {
    let hosts = [HostPort::new(host, port)];
    match runtime.construct_client(&hosts, false).await {
        Ok(client) => Ok(client),
        Err(e) => {
            reporter.error(format!("[FAIL] client construction failed: {e}"));
            Err(HarnessError::ConstructionFailed(e.to_string()))
        }
    }
}

/// Require the constructed client to report a live connection
pub fn check_connected(
    client: &dyn DriverClient,
    reporter: &Reporter,
) -> Result<(), HarnessError> {
    if !client.is_connected() {
        reporter.error("[FAIL] not connected to the target cluster.");
        return Err(HarnessError::NotConnected);
    }
    reporter.info("[OK] connected.");
    Ok(())
}
