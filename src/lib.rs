//! Edge trace shipper library.
//!
//! Supervises a reverse proxy and turns the access-log records it writes
//! into a FIFO into spans delivered to a tracing collector.

pub mod config;
pub mod delivery;
pub mod ingest;
pub mod lifecycle;
pub mod observability;
pub mod pipeline;
pub mod resilience;
pub mod span;

pub use config::ShipperConfig;
pub use lifecycle::{ExitReason, Shutdown, Supervisor};
pub use pipeline::{Pipeline, PipelineError};
