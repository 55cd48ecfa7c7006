//! Collector wire schema (Zipkin v1 JSON).

use serde::Serialize;
use serde_json::Value;

/// Client-start annotation value.
pub const CLIENT_SEND: &str = "cs";

/// Client-receive annotation value.
pub const CLIENT_RECEIVE: &str = "cr";

/// One span document. Field order is the serialized order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Span {
    pub trace_id: Value,
    /// Same as `trace_id`: every span is its own root.
    pub id: Value,
    pub name: String,
    pub duration: u64,
    /// Microseconds since the Unix epoch.
    pub timestamp: u64,
    pub parent_id: Option<String>,
    pub annotations: Vec<Annotation>,
    pub binary_annotations: Vec<BinaryAnnotation>,
}

/// Timestamped event on a span.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub timestamp: u64,
    pub value: &'static str,
    pub endpoint: Endpoint,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub service_name: String,
}

/// Static key/value tag on a span.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinaryAnnotation {
    pub key: &'static str,
    pub value: Value,
}

impl Span {
    /// Request body for the collector: a one-element span array.
    pub fn to_payload(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(std::slice::from_ref(self))
    }
}
