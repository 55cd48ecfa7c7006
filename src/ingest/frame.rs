//! Newline-delimited framing over a byte stream.
//!
//! # Responsibilities
//! - Accumulate bytes from the source in a single buffer
//! - Emit every complete record before reading again
//! - Hold partial records across reads, never emitting them early
//!
//! # Design Decisions
//! - Suspends only on the underlying read; no polling loop
//! - End-of-stream is a failure: the channel is expected to outlive the reader
//! - Frames are raw bytes; UTF-8 and JSON checks belong to the decoder

use bytes::{Bytes, BytesMut};
use futures_util::Stream;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Record delimiter.
pub const DELIMITER: u8 = b'\n';

/// Default number of bytes requested per read.
pub const DEFAULT_CHUNK_BYTES: usize = 2048;

/// Errors that end a frame sequence.
#[derive(Debug, Error)]
pub enum FrameError {
    /// The source reported end-of-stream.
    #[error("channel closed ({pending} bytes of an incomplete record held)")]
    Closed { pending: usize },

    /// The underlying read failed.
    #[error("channel read failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Splits a byte stream into newline-delimited records.
pub struct FrameReader<R> {
    source: R,
    buffer: BytesMut,
    /// Prefix of `buffer` already known to contain no delimiter.
    scanned: usize,
    chunk_bytes: usize,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    /// Create a reader requesting at most `chunk_bytes` per read.
    pub fn new(source: R, chunk_bytes: usize) -> Self {
        let chunk_bytes = chunk_bytes.max(1);
        Self {
            source,
            buffer: BytesMut::with_capacity(chunk_bytes),
            scanned: 0,
            chunk_bytes,
        }
    }

    /// Return the next complete record, without its delimiter.
    pub async fn next_frame(&mut self) -> Result<Bytes, FrameError> {
        loop {
            if let Some(frame) = self.split_frame() {
                return Ok(frame);
            }

            let read = (&mut self.source)
                .take(self.chunk_bytes as u64)
                .read_buf(&mut self.buffer)
                .await?;

            if read == 0 {
                return Err(FrameError::Closed {
                    pending: self.buffer.len(),
                });
            }
        }
    }

    /// Consume the reader as a lazy stream of records.
    ///
    /// The stream yields the terminating error once and then ends.
    pub fn into_stream(self) -> impl Stream<Item = Result<Bytes, FrameError>> {
        futures_util::stream::unfold(Some(self), |state| async move {
            let mut reader = state?;
            match reader.next_frame().await {
                Ok(frame) => Some((Ok(frame), Some(reader))),
                Err(e) => Some((Err(e), None)),
            }
        })
    }

    fn split_frame(&mut self) -> Option<Bytes> {
        let offset = self.buffer[self.scanned..]
            .iter()
            .position(|&b| b == DELIMITER);

        match offset {
            Some(offset) => {
                let end = self.scanned + offset;
                let mut frame = self.buffer.split_to(end + 1);
                frame.truncate(end);
                self.scanned = 0;
                Some(frame.freeze())
            }
            None => {
                self.scanned = self.buffer.len();
                None
            }
        }
    }
}
