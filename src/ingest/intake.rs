//! Producer loop: frames → decoded entries → delivery queue.

use std::convert::Infallible;

use thiserror::Error;
use tokio::io::AsyncRead;

use crate::delivery::queue::{QueueClosed, QueueSender};
use crate::ingest::decode::{decode_record, LogEntry};
use crate::ingest::frame::{FrameError, FrameReader};
use crate::observability::metrics;

/// Reasons the intake loop stops. All of them are fatal to the pipeline.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Source(#[from] FrameError),

    #[error("delivery worker is gone: {0}")]
    Queue(#[from] QueueClosed),
}

/// Reads records from the channel and hands decoded entries to the worker.
pub struct Intake<R> {
    frames: FrameReader<R>,
    queue: QueueSender<LogEntry>,
}

impl<R: AsyncRead + Unpin> Intake<R> {
    pub fn new(frames: FrameReader<R>, queue: QueueSender<LogEntry>) -> Self {
        Self { frames, queue }
    }

    /// Run until the source fails or the consumer disappears.
    ///
    /// Malformed records are logged and skipped.
    pub async fn run(mut self) -> Result<Infallible, IngestError> {
        loop {
            let frame = self.frames.next_frame().await?;

            match decode_record(&frame) {
                Ok(entry) => {
                    metrics::record_decoded(true);
                    self.queue.push(entry)?;
                    tracing::trace!(queue_depth = self.queue.len(), "Record queued");
                }
                Err(e) => {
                    metrics::record_decoded(false);
                    tracing::warn!(
                        error = %e,
                        record = %String::from_utf8_lossy(&frame),
                        "Could not parse record, ignoring it"
                    );
                }
            }
        }
    }
}
