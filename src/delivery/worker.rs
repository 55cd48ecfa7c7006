//! Consumer loop: queue → span → collector, retried until acknowledged.
//!
//! # State Machine (per entry)
//! ```text
//! Translate ──err──▶ dropped (logged)
//!     │
//!     ▼
//! Serialize ─▶ Send ──202──▶ Acknowledged ─▶ next entry
//!     ▲          │
//!     └─ wait ◀──┘ any other outcome
//! ```
//!
//! # Design Decisions
//! - Head-of-line blocking: the next entry is not popped until the current
//!   one is acknowledged, so the queue absorbs collector outages
//! - The serialized payload is reused across retries

use bytes::Bytes;

use crate::delivery::collector::{Collector, DeliveryError};
use crate::delivery::queue::QueueReceiver;
use crate::ingest::LogEntry;
use crate::observability::metrics;
use crate::resilience::FixedBackoff;
use crate::span::{Span, SpanTranslator};

/// Totals reported when the worker stops.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WorkerStats {
    pub delivered: u64,
    pub dropped: u64,
    pub failed_attempts: u64,
}

/// Drains the delivery queue into a collector.
pub struct DeliveryWorker<C> {
    queue: QueueReceiver<LogEntry>,
    translator: SpanTranslator,
    collector: C,
    backoff: FixedBackoff,
    stats: WorkerStats,
}

impl<C: Collector> DeliveryWorker<C> {
    pub fn new(
        queue: QueueReceiver<LogEntry>,
        translator: SpanTranslator,
        collector: C,
        backoff: FixedBackoff,
    ) -> Self {
        Self {
            queue,
            translator,
            collector,
            backoff,
            stats: WorkerStats::default(),
        }
    }

    /// Process entries until every producer is gone and the queue is empty.
    pub async fn run(mut self) -> WorkerStats {
        tracing::info!(collector = %self.collector.endpoint(), "Delivery worker started");

        while let Some(entry) = self.queue.pop().await {
            self.process(&entry).await;
        }

        tracing::info!(
            delivered = self.stats.delivered,
            dropped = self.stats.dropped,
            "Delivery queue closed"
        );
        self.stats
    }

    async fn process(&mut self, entry: &LogEntry) {
        let span = match self.translator.translate(entry) {
            Ok(span) => span,
            Err(e) => {
                metrics::record_span_dropped();
                self.stats.dropped += 1;
                tracing::warn!(
                    error = %e,
                    trace_id = %entry.get("trace_id"),
                    "Could not translate entry into a span, dropping it"
                );
                return;
            }
        };

        let attempts = self.deliver(&span).await;
        self.stats.delivered += 1;
        tracing::info!(
            trace_id = %span.trace_id,
            attempts,
            queue_depth = self.queue.len(),
            "Pushed span to collector"
        );
    }

    /// Send `span` until the collector acknowledges it. Returns the attempt count.
    pub async fn deliver(&mut self, span: &Span) -> u64 {
        let mut payload = None;
        let mut attempt = 0u64;

        loop {
            attempt += 1;
            match self.attempt(span, &mut payload).await {
                Ok(()) => {
                    metrics::record_delivery_attempt(true);
                    return attempt;
                }
                Err(e) => {
                    metrics::record_delivery_attempt(false);
                    self.stats.failed_attempts += 1;
                    tracing::warn!(
                        error = %e,
                        trace_id = %span.trace_id,
                        attempt,
                        retry_in_ms = self.backoff.delay_for(attempt).as_millis() as u64,
                        "Failed to push span to collector"
                    );
                    self.backoff.wait().await;
                }
            }
        }
    }

    async fn attempt(&self, span: &Span, payload: &mut Option<Bytes>) -> Result<(), DeliveryError> {
        let body = match payload.as_ref() {
            Some(body) => body.clone(),
            None => payload.insert(Bytes::from(span.to_payload()?)).clone(),
        };
        self.collector.submit(body).await
    }
}
