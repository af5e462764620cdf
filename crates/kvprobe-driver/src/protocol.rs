//! Wire protocol for the built-in TCP driver
//!
//! Binary framing: one command byte, a big-endian u32 payload length, then
//! the payload. Responses carry a status byte in place of the command byte.

use crate::types::{BinMap, BinValue, RecordKey};
use std::io;
use thiserror::Error;

/// Protocol error types
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid status byte: {0}")]
    InvalidStatus(u8),

    #[error("Invalid value type: {0}")]
    InvalidValueType(u8),

    #[error("Payload too large: {0} bytes (max 16MB)")]
    PayloadTooLarge(u32),

    #[error("Invalid UTF-8 string")]
    InvalidUtf8,

    #[error("Unexpected end of data")]
    UnexpectedEof,
}

/// Command codes
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Put = 0x01,
    Get = 0x02,
    Remove = 0x03,
    Ping = 0x04,
}

/// Response status codes
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WireStatus {
    Ok = 0x00,
    NotFound = 0x01,
    Error = 0x02,
}

impl TryFrom<u8> for WireStatus {
    type Error = ProtocolError;

    fn try_from(byte: u8) -> Result<Self, ProtocolError> {
        match byte {
            0x00 => Ok(WireStatus::Ok),
            0x01 => Ok(WireStatus::NotFound),
            0x02 => Ok(WireStatus::Error),
            _ => Err(ProtocolError::InvalidStatus(byte)),
        }
    }
}

/// Value type codes
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq)]
enum ValueType {
    Null = 0x00,
    Int = 0x01,
    Float = 0x02,
    String = 0x03,
    Bytes = 0x04,
}

pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024; // 16MB

/// Encode a record key as three length-prefixed strings
pub fn encode_key(key: &RecordKey) -> Vec<u8> {
    let mut buf = Vec::new();
    for part in [&key.namespace, &key.set_name, &key.key] {
        buf.extend_from_slice(&(part.len() as u16).to_be_bytes());
        buf.extend_from_slice(part.as_bytes());
    }
    buf
}

/// Encode a bin map: count, then name/value pairs
pub fn encode_bins(bins: &BinMap) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(&(bins.len() as u16).to_be_bytes());
    for (name, value) in bins {
        buf.extend_from_slice(&(name.len() as u16).to_be_bytes());
        buf.extend_from_slice(name.as_bytes());
        encode_value_into(&mut buf, value);
    }
    buf
}

/// Decode a bin map from a response payload
pub fn decode_bins(data: &[u8]) -> Result<BinMap, ProtocolError> {
    if data.len() < 2 {
        return Err(ProtocolError::UnexpectedEof);
    }
    let count = u16::from_be_bytes([data[0], data[1]]) as usize;
    let mut pos = 2;
    let mut bins = BinMap::new();

    for _ in 0..count {
        if data.len() < pos + 2 {
            return Err(ProtocolError::UnexpectedEof);
        }
        let name_len = u16::from_be_bytes([data[pos], data[pos + 1]]) as usize;
        pos += 2;
        if data.len() < pos + name_len {
            return Err(ProtocolError::UnexpectedEof);
        }
        let name = std::str::from_utf8(&data[pos..pos + name_len])
            .map_err(|_| ProtocolError::InvalidUtf8)?
            .to_string();
        pos += name_len;
        let (value, consumed) = decode_value(&data[pos..])?;
        pos += consumed;
        bins.insert(name, value);
    }

    Ok(bins)
}

fn encode_value_into(buf: &mut Vec<u8>, value: &BinValue) {
    match value {
        BinValue::Null => {
            buf.push(ValueType::Null as u8);
        }
        BinValue::Int(n) => {
            buf.push(ValueType::Int as u8);
            buf.extend_from_slice(&n.to_be_bytes());
        }
        BinValue::Float(f) => {
            buf.push(ValueType::Float as u8);
            buf.extend_from_slice(&f.to_be_bytes());
        }
        BinValue::String(s) => {
            buf.push(ValueType::String as u8);
            buf.extend_from_slice(&(s.len() as u32).to_be_bytes());
            buf.extend_from_slice(s.as_bytes());
        }
        BinValue::Bytes(b) => {
            buf.push(ValueType::Bytes as u8);
            buf.extend_from_slice(&(b.len() as u32).to_be_bytes());
            buf.extend_from_slice(b);
        }
    }
}

/// Decode a single value, returning it and the number of bytes consumed
pub fn decode_value(data: &[u8]) -> Result<(BinValue, usize), ProtocolError> {
    if data.is_empty() {
        return Err(ProtocolError::UnexpectedEof);
    }

    let type_byte = data[0];
    let mut pos = 1;

    match type_byte {
        0x00 => Ok((BinValue::Null, pos)),
        0x01 => {
            if data.len() < pos + 8 {
                return Err(ProtocolError::UnexpectedEof);
            }
            let n = i64::from_be_bytes(data[pos..pos + 8].try_into().unwrap());
            Ok((BinValue::Int(n), pos + 8))
        }
        0x02 => {
            if data.len() < pos + 8 {
                return Err(ProtocolError::UnexpectedEof);
            }
            let f = f64::from_be_bytes(data[pos..pos + 8].try_into().unwrap());
            Ok((BinValue::Float(f), pos + 8))
        }
        0x03 => {
            if data.len() < pos + 4 {
                return Err(ProtocolError::UnexpectedEof);
            }
            let len = u32::from_be_bytes(data[pos..pos + 4].try_into().unwrap()) as usize;
            pos += 4;
            if data.len() < pos + len {
                return Err(ProtocolError::UnexpectedEof);
            }
            let s = std::str::from_utf8(&data[pos..pos + len])
                .map_err(|_| ProtocolError::InvalidUtf8)?
                .to_string();
            Ok((BinValue::String(s), pos + len))
        }
        0x04 => {
            if data.len() < pos + 4 {
                return Err(ProtocolError::UnexpectedEof);
            }
            let len = u32::from_be_bytes(data[pos..pos + 4].try_into().unwrap()) as usize;
            pos += 4;
            if data.len() < pos + len {
                return Err(ProtocolError::UnexpectedEof);
            }
            let b = data[pos..pos + len].to_vec();
            Ok((BinValue::Bytes(b), pos + len))
        }
        _ => Err(ProtocolError::InvalidValueType(type_byte)),
    }
}
