//! Shipping pipeline: intake and delivery on two tasks joined by the queue.
//!
//! ```text
//!   intake task (current)              worker task (spawned)
//! ┌──────────────────────────┐       ┌──────────────────────────────┐
//! │ FrameReader → decode     │──────▶│ pop → translate → POST/retry │
//! └──────────────────────────┘ queue └──────────────────────────────┘
//! ```
//!
//! Either task ending is fatal: the intake only stops when its source
//! fails, and the worker only stops if it panics.

use std::convert::Infallible;

use thiserror::Error;
use tokio::io::AsyncRead;

use crate::config::ShipperConfig;
use crate::delivery::{delivery_queue, Collector, DeliveryWorker, HttpCollector};
use crate::ingest::{FrameReader, IngestError, Intake};
use crate::lifecycle::fifo::{open_channel, ChannelError};
use crate::resilience::FixedBackoff;
use crate::span::SpanTranslator;

/// Why the pipeline stopped.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Channel(#[from] ChannelError),

    #[error("failed to build collector client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("intake stopped: {0}")]
    Ingest(#[from] IngestError),

    #[error("delivery worker panicked: {0}")]
    WorkerPanicked(String),

    #[error("delivery worker stopped unexpectedly")]
    WorkerStopped,
}

/// Intake and worker, ready to run.
pub struct Pipeline<R, C> {
    intake: Intake<R>,
    worker: DeliveryWorker<C>,
}

impl<R, C> Pipeline<R, C>
where
    R: AsyncRead + Unpin,
    C: Collector + 'static,
{
    pub fn new(source: R, collector: C, config: &ShipperConfig) -> Self {
        let (tx, rx) = delivery_queue();
        let frames = FrameReader::new(source, config.channel.read_chunk_bytes);

        Self {
            intake: Intake::new(frames, tx),
            worker: DeliveryWorker::new(
                rx,
                SpanTranslator::new(&config.span),
                collector,
                FixedBackoff::from_millis(config.collector.retry_delay_ms),
            ),
        }
    }

    /// Run until one side fails. Never returns `Ok`.
    pub async fn run(self) -> Result<Infallible, PipelineError> {
        let mut worker = tokio::spawn(self.worker.run());

        tokio::select! {
            result = self.intake.run() => {
                worker.abort();
                match result {
                    Ok(never) => match never {},
                    Err(e) => Err(PipelineError::Ingest(e)),
                }
            }
            joined = &mut worker => match joined {
                Err(e) if e.is_panic() => Err(PipelineError::WorkerPanicked(e.to_string())),
                _ => Err(PipelineError::WorkerStopped),
            },
        }
    }
}

/// Open the configured channel and ship its records to the collector.
pub async fn run_shipper(config: ShipperConfig) -> Result<Infallible, PipelineError> {
    let collector = HttpCollector::new(&config.collector)?;
    let source = open_channel(&config.channel)?;

    tracing::info!(
        channel = %config.channel.path,
        collector = %config.collector.url,
        retry_delay_ms = config.collector.retry_delay_ms,
        duration_unit = ?config.span.duration_unit,
        "Log shipper started"
    );

    Pipeline::new(source, collector, &config).run().await
}
