//! Delivery subsystem.
//!
//! # Data Flow
//! ```text
//! queue.rs (unbounded FIFO of LogEntry)
//!     → worker.rs (translate, serialize, retry loop)
//!     → collector.rs (HTTP POST, 202 = acknowledged)
//! ```
//!
//! # Design Decisions
//! - At-least-once: an entry leaves the worker only once acknowledged
//! - Delivery failures are expected and never fatal

pub mod collector;
pub mod queue;
pub mod worker;

pub use collector::{Collector, DeliveryError, HttpCollector};
pub use queue::{delivery_queue, QueueClosed, QueueReceiver, QueueSender};
pub use worker::{DeliveryWorker, WorkerStats};
