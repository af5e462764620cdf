//! Record and status types shared by the driver surface and its callers

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Value types a bin can hold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BinValue {
    /// Null/None value
    Null,
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Binary data
    Bytes(Vec<u8>),
}

/// Bin name to value mapping; ordered so wire encoding is deterministic
pub type BinMap = BTreeMap<String, BinValue>;

/// Fully qualified record address: namespace, set, user key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordKey {
    pub namespace: String,
    pub set_name: String,
    pub key: String,
}

impl RecordKey {
    pub fn new(
        namespace: impl Into<String>,
        set_name: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            set_name: set_name.into(),
            key: key.into(),
        }
    }

    /// Flat `namespace:set:key` form used in diagnostics
    pub fn qualified(&self) -> String {
        format!("{}:{}:{}", self.namespace, self.set_name, self.key)
    }
}

/// A record as returned by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub key: RecordKey,
    pub bins: BinMap,
}

/// Outcome of a single client operation
#[derive(Debug, Clone, PartialEq)]
pub enum OpStatus {
    /// Operation succeeded
    Ok,
    /// Record does not exist
    NotFound,
    /// Operation failed; carries the driver's detail string
    Failed(String),
}

impl OpStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, OpStatus::Ok)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, OpStatus::NotFound)
    }
}

impl fmt::Display for OpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpStatus::Ok => write!(f, "OK"),
            OpStatus::NotFound => write!(f, "RECORD_NOT_FOUND"),
            OpStatus::Failed(detail) => write!(f, "ERROR({detail})"),
        }
    }
}

/// Single cluster seed address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPort {
    pub addr: String,
    pub port: u16,
}

impl HostPort {
    pub fn new(addr: impl Into<String>, port: u16) -> Self {
        Self {
            addr: addr.into(),
            port,
        }
    }
}

impl fmt::Display for HostPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.addr, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_key() {
        let key = RecordKey::new("test", "smoke", "abc123");
        assert_eq!(key.qualified(), "test:smoke:abc123");
    }

    #[test]
    fn test_status_predicates() {
        assert!(OpStatus::Ok.is_ok());
        assert!(!OpStatus::Ok.is_not_found());
        assert!(OpStatus::NotFound.is_not_found());
        assert!(!OpStatus::Failed("boom".to_string()).is_ok());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(OpStatus::Ok.to_string(), "OK");
        assert_eq!(OpStatus::NotFound.to_string(), "RECORD_NOT_FOUND");
        assert_eq!(
            OpStatus::Failed("timeout".to_string()).to_string(),
            "ERROR(timeout)"
        );
    }

    #[test]
    fn test_record_serializes_to_plain_json() {
        let mut bins = BinMap::new();
        bins.insert("hello".to_string(), BinValue::String("world".to_string()));
        bins.insert("ts".to_string(), BinValue::Int(1_700_000_000));
        let record = Record {
            key: RecordKey::new("test", "smoke", "k1"),
            bins,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"hello\":\"world\""));
        assert!(json.contains("\"ts\":1700000000"));
    }
}
