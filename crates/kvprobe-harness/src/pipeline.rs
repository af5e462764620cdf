//! End-to-end verification pipeline
//!
//! Stage order: availability → sanity → connectivity → round trip. Each
//! stage gates the next; the first failure short-circuits into the final
//! verdict. Once a client has been constructed it is closed on every path.

use crate::availability::DriverAvailability;
use crate::config::{ClusterTarget, ENV_HOST, ENV_NAMESPACE, ENV_PORT, ENV_SET};
use crate::error::HarnessError;
use crate::reporter::Reporter;
use crate::roundtrip::TestRecord;
use crate::verdict::Verdict;
use crate::{probe, roundtrip, sanity};
use kvprobe_driver::{DriverClient, DriverRuntime};
use std::path::PathBuf;

/// One smoke-test run
pub struct SmokePipeline<'a> {
    runtime: &'a dyn DriverRuntime,
    target: ClusterTarget,
    availability: DriverAvailability<'a>,
}

impl<'a> SmokePipeline<'a> {
    pub fn new(
        runtime: &'a dyn DriverRuntime,
        candidates: Vec<PathBuf>,
        target: ClusterTarget,
    ) -> Self {
        Self {
            runtime,
            target,
            availability: DriverAvailability::new(runtime, candidates),
        }
    }

    /// Run all stages and produce the terminal verdict
    pub async fn run(&self, reporter: &Reporter) -> Verdict {
        if let Err(error) = self.availability.ensure(reporter) {
            return Verdict::Failed(error);
        }
        if let Err(error) = sanity::run(self.runtime, reporter) {
            return Verdict::Failed(error);
        }

        let Some(host) = self.target.host.as_deref() else {
            reporter.info("[SKIP] live cluster test skipped.");
            reporter.info(format!(
                "       Set env {ENV_HOST} (and optionally {ENV_PORT}/{ENV_NAMESPACE}/{ENV_SET}) to run it."
            ));
            return Verdict::SkippedLiveTest;
        };

        reporter.info(format!(
            "[INFO] running live cluster test against {}:{} (namespace={}, set={})",
            host, self.target.port, self.target.namespace, self.target.set_name
        ));

        let mut client =
            match probe::connect_client(self.runtime, host, self.target.port, reporter).await {
                Ok(client) => client,
                Err(error) => return Verdict::Failed(error),
            };

        // From here on the client is closed no matter how the live stages end.
        let result = self.run_live(client.as_mut(), reporter).await;
        client.close().await;
        reporter.info("[OK] close() done.");

        match result {
            Ok(()) => Verdict::Passed,
            Err(error) => Verdict::Failed(error),
        }
    }

    async fn run_live(
        &self,
        client: &mut dyn DriverClient,
        reporter: &Reporter,
    ) -> Result<(), HarnessError> {
        probe::check_connected(client, reporter)?;
        let record = TestRecord::generate(&self.target.namespace, &self.target.set_name);
        roundtrip::run(client, &record, reporter).await
    }
}
