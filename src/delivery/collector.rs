//! Collector transport.
//!
//! # Responsibilities
//! - POST one serialized span array to the collector
//! - Classify the response: exactly 202 is an acknowledgement
//! - Report enough detail (status, body) for the failure log

use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use thiserror::Error;

use crate::config::CollectorConfig;

/// The only status treated as acknowledged.
pub const ACCEPTED: StatusCode = StatusCode::ACCEPTED;

/// Errors from a single delivery attempt.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Connection, DNS, or I/O failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The collector answered with something other than 202.
    #[error("collector returned {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The span could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Destination for serialized span payloads.
pub trait Collector: Send + Sync {
    /// Send one payload. `Ok` means the collector acknowledged it.
    fn submit(&self, payload: Bytes) -> impl Future<Output = Result<(), DeliveryError>> + Send;

    /// Where payloads go, for logging.
    fn endpoint(&self) -> &str;
}

/// HTTP collector client.
#[derive(Debug, Clone)]
pub struct HttpCollector {
    client: reqwest::Client,
    url: String,
}

impl HttpCollector {
    pub fn new(config: &CollectorConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            url: config.url.clone(),
        })
    }
}

impl Collector for HttpCollector {
    async fn submit(&self, payload: Bytes) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(payload)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let status = response.status();
        if status == ACCEPTED {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(DeliveryError::Rejected {
            status: status.as_u16(),
            body,
        })
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}
