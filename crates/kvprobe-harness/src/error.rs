//! Failure taxonomy for the verification pipeline
//!
//! Every variant is fatal and terminates the run; each failure class maps to
//! its own stable process exit code so automated callers can branch on cause.

use kvprobe_driver::OpStatus;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Live operation that can fail fatally during the round trip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveOp {
    Put,
    Get,
}

impl fmt::Display for LiveOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiveOp::Put => write!(f, "put"),
            LiveOp::Get => write!(f, "get"),
        }
    }
}

/// Fatal pipeline failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HarnessError {
    #[error("dynamic driver activation is not available in this environment")]
    CapabilityMissing,

    #[error("driver module not found in any candidate path ({} tried)", tried.len())]
    DriverNotFound { tried: Vec<PathBuf> },

    #[error("driver type '{0}' is missing; driver may not be initialized correctly")]
    DriverNotInitialized(String),

    #[error("client construction failed: {0}")]
    ConstructionFailed(String),

    #[error("not connected to the target cluster")]
    NotConnected,

    #[error("{op}() failed with status {status}")]
    OperationFailed { op: LiveOp, status: OpStatus },

    #[error("get() returned unexpected record content")]
    ContentMismatch { record: String },
}

impl HarnessError {
    /// Process exit code for this failure class; stable across runs
    pub fn exit_code(&self) -> i32 {
        match self {
            HarnessError::CapabilityMissing | HarnessError::DriverNotFound { .. } => 2,
            HarnessError::DriverNotInitialized(_) => 3,
            HarnessError::ConstructionFailed(_) => 4,
            HarnessError::NotConnected => 5,
            HarnessError::OperationFailed {
                op: LiveOp::Put, ..
            } => 6,
            HarnessError::OperationFailed {
                op: LiveOp::Get, ..
            } => 7,
            HarnessError::ContentMismatch { .. } => 8,
        }
    }
}
