//! Shared doubles for pipeline scenario tests

use async_trait::async_trait;
use kvprobe_driver::{
    BinMap, BinValue, DriverClient, DriverError, DriverRuntime, HostPort, OpStatus, Record,
    RecordKey, MODULE_NAME,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Behavior script for clients handed out by [`MockRuntime`]
#[derive(Clone, Debug)]
pub struct ClientScript {
    pub connected: bool,
    pub put_status: Option<OpStatus>,
    pub get_status: Option<OpStatus>,
    pub corrupt_get: bool,
    pub remove_status: Option<OpStatus>,
}

impl Default for ClientScript {
    fn default() -> Self {
        Self {
            connected: true,
            put_status: None,
            get_status: None,
            corrupt_get: false,
            remove_status: None,
        }
    }
}

/// Scriptable driver runtime that records construction and client calls
pub struct MockRuntime {
    pub active: AtomicBool,
    pub supports_activation: bool,
    pub client_type_present: bool,
    pub status_constant_present: bool,
    pub construct_error: Option<String>,
    pub script: ClientScript,
    pub construct_calls: AtomicUsize,
    pub op_log: Arc<Mutex<Vec<String>>>,
}

impl MockRuntime {
    /// Driver already active, fully sane surface, clients behave per script
    pub fn active_driver(script: ClientScript) -> Self {
        Self {
            active: AtomicBool::new(true),
            supports_activation: true,
            client_type_present: true,
            status_constant_present: true,
            construct_error: None,
            script,
            construct_calls: AtomicUsize::new(0),
            op_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Driver not active; activation capability as given
    pub fn inactive(supports_activation: bool) -> Self {
        let mut runtime = Self::active_driver(ClientScript::default());
        runtime.active = AtomicBool::new(false);
        runtime.supports_activation = supports_activation;
        runtime
    }

    pub fn ops(&self) -> Vec<String> {
        self.op_log.lock().clone()
    }
}

#[async_trait]
impl DriverRuntime for MockRuntime {
    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    fn supports_activation(&self) -> bool {
        self.supports_activation
    }

    fn activate(&self, _path: &Path) -> Result<bool, DriverError> {
        if !self.supports_activation {
            return Err(DriverError::ActivationUnsupported);
        }
        Ok(false)
    }

    fn active_modules(&self) -> Vec<String> {
        if self.is_active() {
            vec![MODULE_NAME.to_string()]
        } else {
            Vec::new()
        }
    }

    fn reported_version(&self) -> Option<String> {
        Some("9.9.9-test".to_string())
    }

    fn module_dir(&self) -> Option<PathBuf> {
        Some(PathBuf::from("/opt/driver/modules"))
    }

    fn type_exists(&self, name: &str) -> bool {
        self.client_type_present && name == kvprobe_driver::CLIENT_TYPE
    }

    fn constant_defined(&self, name: &str) -> bool {
        self.status_constant_present && name == kvprobe_driver::STATUS_OK_CONSTANT
    }

    fn exported_operations(&self) -> Vec<String> {
        vec![
            "is_connected".to_string(),
            "put".to_string(),
            "get".to_string(),
            "remove".to_string(),
            "close".to_string(),
        ]
    }

    async fn construct_client(
        &self,
        _hosts: &[HostPort],
        _shared: bool,
    ) -> Result<Box<dyn DriverClient>, DriverError> {
        self.construct_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.construct_error {
            return Err(DriverError::Construction(message.clone()));
        }
        Ok(Box::new(MockClient {
            script: self.script.clone(),
            store: HashMap::new(),
            log: Arc::clone(&self.op_log),
        }))
    }
}

/// In-memory client following its [`ClientScript`]
#[derive(Debug)]
pub struct MockClient {
    script: ClientScript,
    store: HashMap<String, BinMap>,
    log: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl DriverClient for MockClient {
    fn is_connected(&self) -> bool {
        self.script.connected
    }

    async fn put(&mut self, key: &RecordKey, bins: &BinMap) -> OpStatus {
        self.log.lock().push("put".to_string());
        if let Some(status) = &self.script.put_status {
            return status.clone();
        }
        self.store.insert(key.qualified(), bins.clone());
        OpStatus::Ok
    }

    async fn get(&mut self, key: &RecordKey) -> (OpStatus, Option<Record>) {
        self.log.lock().push("get".to_string());
        if let Some(status) = &self.script.get_status {
            return (status.clone(), None);
        }
        if self.script.corrupt_get {
            let mut bins = BinMap::new();
            bins.insert("hello".to_string(), BinValue::String("WORLD".to_string()));
            return (
                OpStatus::Ok,
                Some(Record {
                    key: key.clone(),
                    bins,
                }),
            );
        }
        match self.store.get(&key.qualified()) {
            Some(bins) => (
                OpStatus::Ok,
                Some(Record {
                    key: key.clone(),
                    bins: bins.clone(),
                }),
            ),
            None => (OpStatus::NotFound, None),
        }
    }

    async fn remove(&mut self, key: &RecordKey) -> OpStatus {
        self.log.lock().push("remove".to_string());
        if let Some(status) = &self.script.remove_status {
            return status.clone();
        }
        match self.store.remove(&key.qualified()) {
            Some(_) => OpStatus::Ok,
            None => OpStatus::NotFound,
        }
    }

    async fn close(&mut self) {
        self.log.lock().push("close".to_string());
    }
}
