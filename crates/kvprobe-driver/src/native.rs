//! Built-in, statically linked driver
//!
//! Speaks the binary wire protocol to a single cluster seed node over TCP.
//! Because the driver is compiled into the binary, `activate` is modeled as
//! a no-op success and the capability surface is always present.

use crate::protocol::{self, Command, ProtocolError, WireStatus, MAX_PAYLOAD_SIZE};
use crate::runtime::{
    DriverClient, DriverError, DriverRuntime, CLIENT_TYPE, MODULE_NAME, STATUS_OK_CONSTANT,
};
use crate::types::{BinMap, HostPort, OpStatus, Record, RecordKey};
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

/// Connection settings for the built-in driver
#[derive(Debug, Clone)]
pub struct NativeConfig {
    /// Timeout applied to the initial TCP connect
    pub connect_timeout: Duration,
}

impl Default for NativeConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl NativeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the connect timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

/// Statically linked driver runtime
#[derive(Debug, Default)]
pub struct NativeRuntime {
    config: NativeConfig,
}

impl NativeRuntime {
    pub fn new(config: NativeConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl DriverRuntime for NativeRuntime {
    // Compiled in: the capability surface is always present.
    fn is_active(&self) -> bool {
        true
    }

    fn supports_activation(&self) -> bool {
        true
    }

    // Nothing to load; report success so callers treat static linking and
    // dynamic loading uniformly.
    fn activate(&self, path: &Path) -> Result<bool, DriverError> {
        debug!(path = %path.display(), "activate() on statically linked driver");
        Ok(true)
    }

    fn active_modules(&self) -> Vec<String> {
        vec![MODULE_NAME.to_string()]
    }

    fn reported_version(&self) -> Option<String> {
        Some(env!("CARGO_PKG_VERSION").to_string())
    }

    fn module_dir(&self) -> Option<PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf))
    }

    fn type_exists(&self, name: &str) -> bool {
        name == CLIENT_TYPE
    }

    fn constant_defined(&self, name: &str) -> bool {
        name == STATUS_OK_CONSTANT
    }

    fn exported_operations(&self) -> Vec<String> {
        ["is_connected", "put", "get", "remove", "close"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    async fn construct_client(
        &self,
        hosts: &[HostPort],
        shared: bool,
    ) -> Result<Box<dyn DriverClient>, DriverError> {
        if shared {
            return Err(DriverError::Construction(
                "shared client instances are not supported".to_string(),
            ));
        }
        let Some(seed) = hosts.first() else {
            return Err(DriverError::Construction("empty host list".to_string()));
        };
        if seed.addr.is_empty() {
            return Err(DriverError::Construction("empty host address".to_string()));
        }
        Ok(Box::new(NativeClient::connect(seed, &self.config).await))
    }
}

/// TCP client bound to a single seed node
#[derive(Debug)]
pub struct NativeClient {
    stream: Option<TcpStream>,
}

impl NativeClient {
    /// Attempt the connection. An unreachable seed yields a client that
    /// reports itself not connected rather than a construction error.
    async fn connect(seed: &HostPort, config: &NativeConfig) -> Self {
        let attempt = timeout(
            config.connect_timeout,
            TcpStream::connect((seed.addr.as_str(), seed.port)),
        )
        .await;

        let stream = match attempt {
            Ok(Ok(stream)) => {
                if let Err(e) = stream.set_nodelay(true) {
                    debug!("set_nodelay failed: {e}");
                }
                Some(stream)
            }
            Ok(Err(e)) => {
                debug!(seed = %seed, "connect failed: {e}");
                None
            }
            Err(_) => {
                debug!(seed = %seed, "connect timed out");
                None
            }
        };

        Self { stream }
    }

    /// Send a request and read the response
    async fn request(
        &mut self,
        cmd: Command,
        payload: &[u8],
    ) -> Result<(WireStatus, Vec<u8>), ProtocolError> {
        let stream = self.stream.as_mut().ok_or_else(|| {
            ProtocolError::Io(io::Error::new(io::ErrorKind::NotConnected, "no connection"))
        })?;

        // Build request: command byte + payload length + payload
        let mut req = Vec::with_capacity(5 + payload.len());
        req.push(cmd as u8);
        req.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        req.extend_from_slice(payload);
        stream.write_all(&req).await?;

        // Response header (5 bytes)
        let mut header = [0u8; 5];
        stream.read_exact(&mut header).await?;
        let status = WireStatus::try_from(header[0])?;

        let len = u32::from_be_bytes([header[1], header[2], header[3], header[4]]);
        if len > MAX_PAYLOAD_SIZE {
            return Err(ProtocolError::PayloadTooLarge(len));
        }

        let mut payload = vec![0u8; len as usize];
        if len > 0 {
            stream.read_exact(&mut payload).await?;
        }

        Ok((status, payload))
    }

    fn op_status(status: WireStatus, payload: &[u8]) -> OpStatus {
        match status {
            WireStatus::Ok => OpStatus::Ok,
            WireStatus::NotFound => OpStatus::NotFound,
            WireStatus::Error => OpStatus::Failed(String::from_utf8_lossy(payload).to_string()),
        }
    }
}

#[async_trait]
impl DriverClient for NativeClient {
    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    async fn put(&mut self, key: &RecordKey, bins: &BinMap) -> OpStatus {
        let mut payload = protocol::encode_key(key);
        payload.extend_from_slice(&protocol::encode_bins(bins));
        match self.request(Command::Put, &payload).await {
            Ok((status, body)) => Self::op_status(status, &body),
            Err(e) => OpStatus::Failed(e.to_string()),
        }
    }

    async fn get(&mut self, key: &RecordKey) -> (OpStatus, Option<Record>) {
        let payload = protocol::encode_key(key);
        match self.request(Command::Get, &payload).await {
            Ok((WireStatus::Ok, body)) => match protocol::decode_bins(&body) {
                Ok(bins) => (
                    OpStatus::Ok,
                    Some(Record {
                        key: key.clone(),
                        bins,
                    }),
                ),
                Err(e) => (OpStatus::Failed(e.to_string()), None),
            },
            Ok((status, body)) => (Self::op_status(status, &body), None),
            Err(e) => (OpStatus::Failed(e.to_string()), None),
        }
    }

    async fn remove(&mut self, key: &RecordKey) -> OpStatus {
        let payload = protocol::encode_key(key);
        match self.request(Command::Remove, &payload).await {
            Ok((status, body)) => Self::op_status(status, &body),
            Err(e) => OpStatus::Failed(e.to_string()),
        }
    }

    async fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            if let Err(e) = stream.shutdown().await {
                debug!("shutdown failed: {e}");
            }
        }
    }
}
