//! Driver capability surface
//!
//! The harness never talks to a concrete driver directly; everything goes
//! through these traits so the driver stays an external collaborator.

use crate::types::{BinMap, HostPort, OpStatus, Record, RecordKey};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Module name the runtime lists once the driver is active
pub const MODULE_NAME: &str = "kvdriver";

/// Primary client type the sanity check looks for
pub const CLIENT_TYPE: &str = "Client";

/// Well-known success-status constant expected on the driver surface
pub const STATUS_OK_CONSTANT: &str = "STATUS_OK";

/// Errors surfaced by the driver runtime itself
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    #[error("dynamic activation is not supported by this runtime")]
    ActivationUnsupported,

    #[error("activation failed: {0}")]
    Activation(String),

    #[error("client construction failed: {0}")]
    Construction(String),
}

/// Process-wide driver runtime: activation state and reflection surface.
///
/// Activation is a one-time, irreversible, process-wide action; callers are
/// expected to attempt it at most once per run.
#[async_trait]
pub trait DriverRuntime: Send + Sync {
    /// Whether the driver's capability set is already callable
    fn is_active(&self) -> bool;

    /// Whether this environment can activate a driver module at runtime
    fn supports_activation(&self) -> bool;

    /// Attempt to activate the driver module at `path`.
    ///
    /// Returns `Ok(true)` when the module loaded; the driver must also
    /// report itself active afterwards before it can be trusted.
    fn activate(&self, path: &Path) -> Result<bool, DriverError>;

    /// Names of all modules the runtime currently reports active
    fn active_modules(&self) -> Vec<String>;

    /// Version string reported by the driver, if obtainable
    fn reported_version(&self) -> Option<String>;

    /// Configured module search directory, if any
    fn module_dir(&self) -> Option<PathBuf>;

    /// Whether a named type is visible on the driver surface
    fn type_exists(&self, name: &str) -> bool;

    /// Whether a named constant is defined on the driver surface
    fn constant_defined(&self, name: &str) -> bool;

    /// Operations the driver exports, for informational output
    fn exported_operations(&self) -> Vec<String>;

    /// Construct a client bound to the given seed addresses.
    ///
    /// `shared` selects shared-instance semantics; the smoke harness always
    /// passes `false`. Construction failure is distinct from a constructed
    /// client that reports itself not connected.
    async fn construct_client(
        &self,
        hosts: &[HostPort],
        shared: bool,
    ) -> Result<Box<dyn DriverClient>, DriverError>;
}

/// A constructed driver client
#[async_trait]
pub trait DriverClient: Send + std::fmt::Debug {
    /// Whether the client reports a live cluster connection
    fn is_connected(&self) -> bool;

    /// Write a record
    async fn put(&mut self, key: &RecordKey, bins: &BinMap) -> OpStatus;

    /// Read a record by key
    async fn get(&mut self, key: &RecordKey) -> (OpStatus, Option<Record>);

    /// Delete a record by key
    async fn remove(&mut self, key: &RecordKey) -> OpStatus;

    /// Release the connection; safe to call on never-connected clients
    async fn close(&mut self);
}
