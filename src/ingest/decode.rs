//! Record decoding.

use serde_json::{Map, Value};
use thiserror::Error;

/// One access-log record, as emitted by the proxy.
///
/// No schema is enforced: any JSON object is accepted and absent keys read
/// as `null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogEntry {
    fields: Map<String, Value>,
}

impl LogEntry {
    /// Value for `key`, or `Value::Null` if absent.
    pub fn get(&self, key: &str) -> &Value {
        self.fields.get(key).unwrap_or(&Value::Null)
    }

    /// String value for `key`, if present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Map<String, Value>> for LogEntry {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

/// Why a record could not be decoded.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("record is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("record is JSON {0}, expected an object")]
    NotAnObject(&'static str),
}

/// Decode one record (without its delimiter) into a [`LogEntry`].
pub fn decode_record(record: &[u8]) -> Result<LogEntry, DecodeError> {
    match serde_json::from_slice::<Value>(record)? {
        Value::Object(fields) => Ok(LogEntry::from(fields)),
        other => Err(DecodeError::NotAnObject(json_kind(&other))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
