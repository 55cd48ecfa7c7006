//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (delays > 0, chunk sizes > 0)
//! - Check the collector URL and metrics address are usable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ShipperConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::ShipperConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("collector.url {url:?} is invalid: {reason}")]
    CollectorUrl { url: String, reason: String },

    #[error("observability.metrics_address {0:?} is not a socket address")]
    MetricsAddress(String),

    #[error("observability.log_level {0:?} is not one of trace, debug, info, warn, error")]
    LogLevel(String),
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ShipperConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.channel.path.trim().is_empty() {
        errors.push(ValidationError::Empty { field: "channel.path" });
    }
    if config.channel.read_chunk_bytes == 0 {
        errors.push(ValidationError::Zero { field: "channel.read_chunk_bytes" });
    }

    if let Err(reason) = check_collector_url(&config.collector.url) {
        errors.push(ValidationError::CollectorUrl {
            url: config.collector.url.clone(),
            reason,
        });
    }
    if config.collector.retry_delay_ms == 0 {
        errors.push(ValidationError::Zero { field: "collector.retry_delay_ms" });
    }
    if config.collector.timeout_secs == Some(0) {
        errors.push(ValidationError::Zero { field: "collector.timeout_secs" });
    }

    if config.span.name.trim().is_empty() {
        errors.push(ValidationError::Empty { field: "span.name" });
    }
    if config.span.service_name.trim().is_empty() {
        errors.push(ValidationError::Empty { field: "span.service_name" });
    }

    if config.proxy.program.trim().is_empty() {
        errors.push(ValidationError::Empty { field: "proxy.program" });
    }

    let observability = &config.observability;
    if let Err(e) = check_log_level(&observability.log_level) {
        errors.push(e);
    }
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Replace the configured log level with `level` if it is a known level.
pub fn override_log_level(config: &mut ShipperConfig, level: &str) -> Result<(), ValidationError> {
    check_log_level(level)?;
    config.observability.log_level = level.to_string();
    Ok(())
}

fn check_log_level(level: &str) -> Result<(), ValidationError> {
    if LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
        Ok(())
    } else {
        Err(ValidationError::LogLevel(level.to_string()))
    }
}

fn check_collector_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme {other:?}")),
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    Ok(())
}
