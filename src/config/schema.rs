//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the shipper.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the log shipper and its supervised proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ShipperConfig {
    /// Named channel the proxy writes access-log records into.
    pub channel: ChannelConfig,

    /// Tracing collector endpoint and delivery policy.
    pub collector: CollectorConfig,

    /// Span naming and unit conversion.
    pub span: SpanConfig,

    /// Supervised proxy process.
    pub proxy: ProxyProcessConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Named channel (FIFO) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Filesystem path of the FIFO.
    pub path: String,

    /// Upper bound on bytes requested per read.
    pub read_chunk_bytes: usize,

    /// Open the FIFO read-write so it never reports end-of-stream
    /// when the writer reopens it (Linux only).
    pub hold_open: bool,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            path: "/var/log/nginx/trace_request.pipe".to_string(),
            read_chunk_bytes: crate::ingest::frame::DEFAULT_CHUNK_BYTES,
            hold_open: true,
        }
    }
}

/// Collector configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Span ingestion URL.
    pub url: String,

    /// Fixed delay between delivery attempts in milliseconds.
    pub retry_delay_ms: u64,

    /// Optional per-request timeout in seconds. Unset means no timeout.
    pub timeout_secs: Option<u64>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            url: "http://zipkin:9411/api/v1/spans".to_string(),
            retry_delay_ms: 1000,
            timeout_secs: None,
        }
    }
}

/// Unit written into the span `duration` field.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DurationUnit {
    /// `request_time * 1000`, as deployed dashboards expect.
    #[default]
    LegacyMillis,
    /// `request_time * 1_000_000`, true microseconds.
    Micros,
}

impl DurationUnit {
    /// Multiplier applied to `request_time` seconds.
    pub fn per_second(self) -> f64 {
        match self {
            DurationUnit::LegacyMillis => 1_000.0,
            DurationUnit::Micros => 1_000_000.0,
        }
    }
}

/// Span naming configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SpanConfig {
    /// Span `name` field.
    pub name: String,

    /// `serviceName` attached to both annotations.
    pub service_name: String,

    /// Scaling of `request_time` into `duration`.
    pub duration_unit: DurationUnit,
}

impl Default for SpanConfig {
    fn default() -> Self {
        Self {
            name: "edge-router".to_string(),
            service_name: "edge-router".to_string(),
            duration_unit: DurationUnit::default(),
        }
    }
}

/// Proxy process configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyProcessConfig {
    /// Executable to launch.
    pub program: String,

    /// Arguments passed to the executable.
    pub args: Vec<String>,
}

impl Default for ProxyProcessConfig {
    fn default() -> Self {
        Self {
            program: "/usr/local/openresty/bin/openresty".to_string(),
            args: vec![
                "-c".to_string(),
                "/etc/nginx/nginx.conf".to_string(),
                "-g".to_string(),
                "daemon off;".to_string(),
            ],
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
