//! Ingestion subsystem.
//!
//! # Data Flow
//! ```text
//! FIFO bytes
//!     → frame.rs (newline framing, partial reads held)
//!     → decode.rs (JSON object → LogEntry, malformed records logged)
//!     → intake.rs (push into the delivery queue)
//! ```
//!
//! # Design Decisions
//! - Record-local failures never stop the stream
//! - Source failures stop the stream; the process is restarted externally

pub mod decode;
pub mod frame;
pub mod intake;

pub use decode::{decode_record, DecodeError, LogEntry};
pub use frame::{FrameError, FrameReader};
pub use intake::{Intake, IngestError};
