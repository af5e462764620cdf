//! Put → get → remove round trip
//!
//! Writes a uniquely named record, reads it back, validates bin content
//! exactly, then deletes it. Deleting an already-absent record is
//! acceptable; any other delete failure is only a warning since the
//! correctness check (get) has already passed.

use crate::error::{HarnessError, LiveOp};
use crate::reporter::Reporter;
use kvprobe_driver::{BinMap, BinValue, DriverClient, Record, RecordKey};

/// Bin holding the exact-match string payload
pub const STRING_BIN: &str = "hello";
/// Expected string payload, compared case-sensitively with no coercion
pub const STRING_BIN_VALUE: &str = "world";
/// Bin holding the write timestamp
pub const TIMESTAMP_BIN: &str = "ts";

/// The transient record written and deleted by one run
#[derive(Debug, Clone)]
pub struct TestRecord {
    pub key: RecordKey,
    pub bins: BinMap,
}

impl TestRecord {
    /// Fresh record with a per-run unique key; uniqueness prevents
    /// collisions with concurrent runs against the same namespace/set
    pub fn generate(namespace: &str, set_name: &str) -> Self {
        let key = format!("smoke_{}_{:08x}", std::process::id(), rand::random::<u32>());
        let mut bins = BinMap::new();
        bins.insert(
            STRING_BIN.to_string(),
            BinValue::String(STRING_BIN_VALUE.to_string()),
        );
        bins.insert(
            TIMESTAMP_BIN.to_string(),
            BinValue::Int(chrono::Utc::now().timestamp()),
        );
        Self {
            key: RecordKey::new(namespace, set_name, key),
            bins,
        }
    }
}

/// Run the cycle against an already-connected client
pub async fn run(
    client: &mut dyn DriverClient,
    record: &TestRecord,
    reporter: &Reporter,
) -> Result<(), HarnessError> {
    let status = client.put(&record.key, &record.bins).await;
    if !status.is_ok() {
        reporter.error(format!("[FAIL] put() failed. status={status}"));
        return Err(HarnessError::OperationFailed {
            op: LiveOp::Put,
            status,
        });
    }
    reporter.info("[OK] put() success.");

    let (status, returned) = client.get(&record.key).await;
    if !status.is_ok() {
        reporter.error(format!("[FAIL] get() failed. status={status}"));
        return Err(HarnessError::OperationFailed {
            op: LiveOp::Get,
            status,
        });
    }

    let expected = BinValue::String(STRING_BIN_VALUE.to_string());
    let matches = returned
        .as_ref()
        .is_some_and(|r| r.bins.get(STRING_BIN) == Some(&expected));
    if !matches {
        let dump = dump_record(returned.as_ref());
        reporter.error("[FAIL] get() returned unexpected record.");
        reporter.error(&dump);
        return Err(HarnessError::ContentMismatch { record: dump });
    }
    reporter.info("[OK] get() returned expected bins.");

    let status = client.remove(&record.key).await;
    if status.is_ok() || status.is_not_found() {
        reporter.info("[OK] remove() done.");
    } else {
        reporter.error(format!("[WARN] remove() status={status}"));
    }

    Ok(())
}

fn dump_record(record: Option<&Record>) -> String {
    match record {
        Some(r) => serde_json::to_string_pretty(r).unwrap_or_else(|_| format!("{r:?}")),
        None => "(no record returned)".to_string(),
    }
}
