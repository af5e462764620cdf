//! Native KV driver surface for the kvprobe harness
//!
//! The harness consumes the driver only through the [`DriverRuntime`] and
//! [`DriverClient`] traits; the built-in [`NativeRuntime`] is a statically
//! linked implementation speaking the binary wire protocol over TCP.

mod native;
pub mod protocol;
mod runtime;
mod types;

pub use native::{NativeClient, NativeConfig, NativeRuntime};
pub use runtime::{
    DriverClient, DriverError, DriverRuntime, CLIENT_TYPE, MODULE_NAME, STATUS_OK_CONSTANT,
};
pub use types::{BinMap, BinValue, HostPort, OpStatus, Record, RecordKey};
