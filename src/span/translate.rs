//! LogEntry → Span mapping.
//!
//! # Field Rules
//! - `traceId` and `id` both copy `trace_id`
//! - `duration = trunc(request_time * unit)` where the unit defaults to 1000
//! - `timestamp = floor(epoch_seconds(time)) * 1_000_000`
//! - `cs` at `timestamp`, `cr` at `timestamp + duration`
//! - binary annotations copy request, status, request_method, remote_addr
//!
//! # Design Decisions
//! - Pure: no clock, no counters, same entry → same document
//! - Missing fields become `null`; only an unusable `time` is an error

use serde_json::Value;
use thiserror::Error;

use crate::config::{DurationUnit, SpanConfig};
use crate::ingest::LogEntry;
use crate::span::model::{
    Annotation, BinaryAnnotation, Endpoint, Span, CLIENT_RECEIVE, CLIENT_SEND,
};
use crate::span::timestamp::parse_epoch_seconds;

const MICROS_PER_SECOND: u64 = 1_000_000;

/// Keys copied verbatim into binary annotations, in wire order.
const TAGGED_KEYS: [&str; 4] = ["request", "status", "request_method", "remote_addr"];

/// Why an entry cannot become a span. Retrying never helps.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error("entry has no string `time` field")]
    MissingTime,

    #[error("unrecognised `time` value {0:?}")]
    UnparseableTime(String),

    #[error("`time` value {0:?} is before the Unix epoch")]
    BeforeEpoch(String),
}

/// Builds spans from decoded log entries.
#[derive(Debug, Clone)]
pub struct SpanTranslator {
    name: String,
    service_name: String,
    unit: DurationUnit,
}

impl SpanTranslator {
    pub fn new(config: &SpanConfig) -> Self {
        Self {
            name: config.name.clone(),
            service_name: config.service_name.clone(),
            unit: config.duration_unit,
        }
    }

    pub fn translate(&self, entry: &LogEntry) -> Result<Span, TranslateError> {
        let timestamp = self.timestamp(entry)?;
        let duration = self.duration(entry);
        let trace_id = entry.get("trace_id").clone();

        Ok(Span {
            id: trace_id.clone(),
            trace_id,
            name: self.name.clone(),
            duration,
            timestamp,
            parent_id: None,
            annotations: vec![
                self.annotation(timestamp, CLIENT_SEND),
                self.annotation(timestamp.saturating_add(duration), CLIENT_RECEIVE),
            ],
            binary_annotations: TAGGED_KEYS
                .iter()
                .map(|&key| BinaryAnnotation {
                    key,
                    value: entry.get(key).clone(),
                })
                .collect(),
        })
    }

    fn annotation(&self, timestamp: u64, value: &'static str) -> Annotation {
        Annotation {
            timestamp,
            value,
            endpoint: Endpoint {
                service_name: self.service_name.clone(),
            },
        }
    }

    fn timestamp(&self, entry: &LogEntry) -> Result<u64, TranslateError> {
        let raw = entry.get_str("time").ok_or(TranslateError::MissingTime)?;
        let seconds = parse_epoch_seconds(raw)
            .ok_or_else(|| TranslateError::UnparseableTime(raw.to_string()))?;
        let seconds =
            u64::try_from(seconds).map_err(|_| TranslateError::BeforeEpoch(raw.to_string()))?;
        Ok(seconds.saturating_mul(MICROS_PER_SECOND))
    }

    fn duration(&self, entry: &LogEntry) -> u64 {
        let seconds = request_seconds(entry.get("request_time"));
        // Float-to-int casts truncate toward zero and saturate; NaN maps to 0.
        (seconds * self.unit.per_second()) as u64
    }
}

fn request_seconds(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Null => return 0.0,
        _ => None,
    };
    parsed.unwrap_or_else(|| {
        tracing::debug!(request_time = %value, "Unusable request_time, using 0");
        0.0
    })
}
